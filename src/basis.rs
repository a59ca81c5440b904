//! Local coordinate frame of a polygon selection.
//!
//! The frame's z axis follows the summed polygon normals and its y axis the
//! summed "first edge" directions of the polygons, bent to be perpendicular
//! to z. Use it to move or scale a selection in its own space.

use nalgebra::{Matrix3, Rotation3, Unit, UnitQuaternion, Vector3};
use tracing::{debug, warn};

use crate::mesh::{Mesh, PolygonId};
use crate::selection::{selected_polygons, SelectMode};

const EPSILON: f64 = 1e-12;

/// Orthonormal basis for the given polygons, columns `(x, y, z)`.
///
/// The y seed sums, per polygon, the edge from corner 0 to corner 1 and, for
/// quads, the edge from corner 3 to corner 2. When the seed cancels out or is
/// parallel to the normal sum, y is instead taken from a track-to rotation
/// aiming -Z along the normal with Y up.
///
/// Never fails. An empty selection, or one whose normals cancel, yields the
/// identity matrix.
///
/// # Example
///
/// ```
/// use snet::{selection_matrix, Mesh, PolygonId};
///
/// let cube = Mesh::cube(2.0);
/// let m = selection_matrix(&cube, &[PolygonId::from(1)]);
/// assert!((m[(2, 2)] - 1.0).abs() < 1e-12);
/// assert!((m.determinant() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn selection_matrix(mesh: &Mesh, polygons: &[PolygonId]) -> Matrix3<f64> {
    let mut y_vec = Vector3::zeros();
    let mut z_vec = Vector3::zeros();

    for &p in polygons {
        let corners = p.to_vertices(mesh);
        let v0 = corners[0].to_point(mesh);
        let v1 = corners[1].to_point(mesh);
        y_vec += v1 - v0;

        if corners.len() == 4 {
            let v2 = corners[2].to_point(mesh);
            let v3 = corners[3].to_point(mesh);
            y_vec += v2 - v3;
        }

        z_vec += mesh.polygons[p].normal;
    }

    let Some(z_axis) = Unit::try_new(z_vec, EPSILON) else {
        warn!(polygons = polygons.len(), "selection normals cancel, using identity basis");
        return Matrix3::identity();
    };
    let z_axis = z_axis.into_inner();

    let y_seed = match Unit::try_new(y_vec, EPSILON) {
        Some(y) if y.cross(&z_axis).norm() > EPSILON => y.into_inner(),
        _ => {
            debug!("edge directions degenerate, tracking y from normal");
            tracked_up(&z_axis)
        }
    };

    let y_axis = perpendicular_to(&y_seed, &z_axis);
    let x_axis = y_axis.cross(&z_axis).normalize();

    Matrix3::from_columns(&[x_axis, y_axis, z_axis])
}

/// Basis of whatever polygons are currently selected.
#[must_use]
pub fn active_selection_matrix(mesh: &Mesh) -> Matrix3<f64> {
    let polygons = selected_polygons(mesh, SelectMode::Selected);
    selection_matrix(mesh, &polygons)
}

/// Y column of the rotation that points -Z along the unit vector `dir` with Y as up.
fn tracked_up(dir: &Vector3<f64>) -> Vector3<f64> {
    let target = -dir;
    // Y cannot serve as up when the target lies along it.
    let up = if target.cross(&Vector3::y()).norm() > EPSILON {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let quat = UnitQuaternion::face_towards(&target, &up);
    let m = quat.to_rotation_matrix();
    m.matrix().column(1).into_owned().normalize()
}

/// Rotate unit `y` within the plane it spans with unit `z` until it sits at 90° to `z`.
fn perpendicular_to(y: &Vector3<f64>, z: &Vector3<f64>) -> Vector3<f64> {
    let cross = y.cross(z);
    let deficit = y.angle(z) - std::f64::consts::FRAC_PI_2;
    match Unit::try_new(cross, EPSILON) {
        Some(axis) => (Rotation3::from_axis_angle(&axis, deficit) * *y).normalize(),
        None => *y,
    }
}
