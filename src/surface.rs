//! Iso-surface extraction from a voxel grid.

use fast_surface_nets::ndshape::Shape;
use fast_surface_nets::{surface_nets, SurfaceNetsBuffer};
use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::error::SnetResult;
use crate::grid::VoxelGrid;
use crate::mesh::{Mesh, VertexId};

/// Grid layout handed to the mesher; matches [`VoxelGrid`]'s x-fastest order.
struct GridShape {
    nx: u32,
    ny: u32,
    nz: u32,
}

impl Shape<3> for GridShape {
    type Coord = u32;

    #[inline]
    fn as_array(&self) -> [Self::Coord; 3] {
        [self.nx, self.ny, self.nz]
    }

    fn size(&self) -> Self::Coord {
        self.nx * self.ny * self.nz
    }

    fn usize(&self) -> usize {
        (self.nx * self.ny * self.nz) as usize
    }

    fn linearize(&self, coords: [Self::Coord; 3]) -> u32 {
        let [x, y, z] = coords;
        (z * self.ny + y) * self.nx + x
    }

    fn delinearize(&self, i: u32) -> [Self::Coord; 3] {
        let x = i % self.nx;
        let yz = i / self.nx;
        [x, yz % self.ny, yz / self.ny]
    }
}

/// Mesh the zero level of the grid's current field, negative values inside.
///
/// Vertices are in grid units; with `center` the grid centre is moved to the
/// origin. Grids smaller than two cells along any axis, or without a sign
/// change, produce an empty mesh.
pub fn extract_surface(grid: &VoxelGrid, center: bool) -> SnetResult<Mesh> {
    let [rx, ry, rz] = grid.resolution();
    if rx < 2 || ry < 2 || rz < 2 {
        return Ok(Mesh::new());
    }

    let shape = GridShape {
        nx: rx as u32,
        ny: ry as u32,
        nz: rz as u32,
    };
    let mut buffer = SurfaceNetsBuffer::default();
    surface_nets(
        &grid.current,
        &shape,
        [0, 0, 0],
        [shape.nx - 1, shape.ny - 1, shape.nz - 1],
        &mut buffer,
    );

    let offset = if center {
        grid.center().coords
    } else {
        Vector3::zeros()
    };

    let mut mesh = Mesh::new();
    let ids: Vec<VertexId> = buffer
        .positions
        .iter()
        .map(|&[x, y, z]| {
            let p = Point3::new(f64::from(x), f64::from(y), f64::from(z));
            mesh.add_vertex(p - offset)
        })
        .collect();

    for tri in buffer.indices.chunks_exact(3) {
        let corners = tri.iter().map(|&i| ids[i as usize]).collect();
        mesh.add_polygon(corners)?;
    }

    debug!(
        vertices = mesh.vertices.len(),
        polygons = mesh.polygons.len(),
        "surface nets output"
    );
    Ok(mesh)
}
