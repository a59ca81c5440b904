//! Surface nets grown from a voxel field, plus geometry queries over mesh
//! selections.
//!
//! # Surface nets
//!
//! A [`SurfaceNet`] owns a cubic [`VoxelGrid`] whose cells carry a target, a
//! current value and a growth state. Cells step toward their targets over
//! time and the current field is meshed with the surface-nets technique.
//!
//! ```
//! use snet::{AnimateMode, SurfaceNet, SurfaceNetConfig};
//!
//! let config = SurfaceNetConfig::default()
//!     .grid_size(12)
//!     .animate(AnimateMode::Animate)
//!     .debug(false);
//! let net = SurfaceNet::new(config).unwrap();
//! assert!(!net.is_growing());
//! assert!(!net.to_mesh().unwrap().polygons.is_empty());
//! ```
//!
//! # Selection geometry
//!
//! ```
//! use snet::{average_outer_edge_length, selection_matrix, Mesh, PolygonId};
//!
//! let mut cube = Mesh::cube(1.0);
//! cube.select_polygon(PolygonId::from(1));
//! assert!((average_outer_edge_length(&cube) - 1.0).abs() < 1e-12);
//! let basis = selection_matrix(&cube, &[PolygonId::from(1)]);
//! assert!((basis.determinant() - 1.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod basis;
pub mod config;
mod error;
pub mod grid;
pub mod growth;
pub mod idx;
pub mod io;
pub mod measure;
pub mod mesh;
pub mod selection;
pub mod surface;

pub use basis::{active_selection_matrix, selection_matrix};
pub use config::{AnimateMode, SurfaceNetConfig};
pub use error::{SnetError, SnetResult};
pub use grid::VoxelGrid;
pub use growth::SurfaceNet;
pub use io::{load_obj, save_obj};
pub use measure::{
    average_outer_edge_length, selection_centroid, selection_radius, shortest_outer_edge_length,
};
pub use mesh::{EdgeId, Mesh, PolygonId, Selectable, VertexId};
pub use selection::{
    contains_selected_item, has_selected, selected_edges, selected_ids, selected_polygons,
    selected_vertices, ElementIds, ElementKind, MeshSelection, SelectMode,
};
pub use surface::extract_surface;

pub use nalgebra::{Matrix3, Point3, Vector3};
