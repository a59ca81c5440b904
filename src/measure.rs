//! Measurements of a polygon selection against its unselected surroundings.
//!
//! An outer edge is a selected edge whose vertices are shared with polygons
//! outside the selection. All queries are fail-soft: an empty selection or a
//! selection without outer edges returns a sentinel, never an error.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::mesh::{Mesh, PolygonId, VertexId};
use crate::selection::{contains_selected_item, selected_edges, SelectMode};

/// Closest point to `p` on the infinite line through `a` and `b`, with its
/// parameter along `a -> b`. A zero-length line collapses to `a`.
pub fn closest_point_on_line(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> (Point3<f64>, f64) {
    let dir = b - a;
    let len_sq = dir.norm_squared();
    if len_sq == 0.0 {
        return (*a, 0.0);
    }
    let t = (p - a).dot(&dir) / len_sq;
    (a + dir * t, t)
}

fn unselected_polygon_vertices(mesh: &Mesh) -> HashSet<VertexId> {
    mesh.polygons
        .values()
        .filter(|p| !p.select)
        .flat_map(|p| p.vertices.iter().copied())
        .collect()
}

/// Mean corner position of the selected polygons, `None` when none are selected.
pub fn selection_centroid(mesh: &Mesh) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in mesh.polygons.values().filter(|p| p.select) {
        for &v in &p.vertices {
            sum += v.to_point(mesh).coords;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some(Point3::from(sum / count as f64))
}

/// Smallest distance from the selection centroid to an outer edge.
///
/// Each outer edge contributes the distance from the centroid to the line
/// through it; an edge with both vertices on the outside also contributes half
/// its own length. Returns `0.0` when no polygon is selected or no outer edge
/// exists.
///
/// # Example
///
/// ```
/// use snet::{selection_radius, Mesh, PolygonId};
///
/// let mut cube = Mesh::cube(2.0);
/// assert_eq!(selection_radius(&cube), 0.0);
///
/// cube.select_polygon(PolygonId::from(1));
/// assert!((selection_radius(&cube) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn selection_radius(mesh: &Mesh) -> f64 {
    if !contains_selected_item(mesh.polygons.values()) {
        return 0.0;
    }
    let Some(center) = selection_centroid(mesh) else {
        return 0.0;
    };
    let outside = unselected_polygon_vertices(mesh);

    let mut radius: Option<f64> = None;
    let mut keep_min = |candidate: f64| {
        radius = Some(radius.map_or(candidate, |r| r.min(candidate)));
    };

    for e in selected_edges(mesh, SelectMode::Selected) {
        let [a, b] = mesh.edges[e].vertices;
        let on_outside = [a, b].iter().filter(|v| outside.contains(*v)).count();
        if on_outside == 0 {
            continue;
        }

        let v0 = a.to_point(mesh);
        let v1 = b.to_point(mesh);

        if on_outside > 1 {
            keep_min((v0 - v1).norm() * 0.5);
        }

        let (foot, _) = closest_point_on_line(&center, v0, v1);
        keep_min((center - foot).norm());
    }

    let radius = radius.unwrap_or(0.0);
    debug!(radius, "selection radius");
    radius
}

/// Shortest positive length among selected edges whose two vertices both
/// belong to unselected polygons.
///
/// `None` when there is no such edge.
#[must_use]
pub fn shortest_outer_edge_length(mesh: &Mesh) -> Option<f64> {
    let outside = unselected_polygon_vertices(mesh);
    if outside.is_empty() {
        return None;
    }

    selected_edges(mesh, SelectMode::Selected)
        .into_iter()
        .filter(|&e| {
            let [a, b] = mesh.edges[e].vertices;
            outside.contains(&a) && outside.contains(&b)
        })
        .map(|e| e.length(mesh))
        .filter(|&len| len > 0.0)
        .min_by(f64::total_cmp)
}

/// Mean length of the selected edges that lie on some unselected polygon.
///
/// An edge counts once, against the first unselected polygon holding both of
/// its vertices. Returns `0.0` when no edge qualifies.
#[must_use]
pub fn average_outer_edge_length(mesh: &Mesh) -> f64 {
    let outside: Vec<PolygonId> = mesh
        .polygons
        .iter()
        .filter(|(_, p)| !p.select)
        .map(|(id, _)| id)
        .collect();
    if outside.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for e in selected_edges(mesh, SelectMode::Selected) {
        let [a, b] = mesh.edges[e].vertices;
        let bordering = outside
            .iter()
            .find(|p| p.contains_vertex(mesh, a) && p.contains_vertex(mesh, b));
        if bordering.is_some() {
            total += e.length(mesh);
            count += 1;
        }
    }

    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_with_face(size: f64, face: usize) -> Mesh {
        let mut cube = Mesh::cube(size);
        cube.select_polygon(PolygonId::from(face));
        cube
    }

    #[test]
    fn closest_point_projects_onto_line() {
        let (foot, t) = closest_point_on_line(
            &Point3::new(0.5, 2.0, 0.0),
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert!((foot - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-12);
        assert!((t - 0.5).abs() < 1e-12);

        // Beyond the segment end, still on the line.
        let (foot, t) = closest_point_on_line(
            &Point3::new(3.0, 1.0, 0.0),
            &Point3::origin(),
            &Point3::new(1.0, 0.0, 0.0),
        );
        assert!((foot.x - 3.0).abs() < 1e-12);
        assert!((t - 3.0).abs() < 1e-12);
    }

    #[test]
    fn radius_of_empty_selection_is_zero() {
        let cube = Mesh::cube(3.0);
        assert_eq!(selection_radius(&cube), 0.0);
        assert!(selection_centroid(&cube).is_none());
    }

    #[test]
    fn radius_of_single_cube_face_is_half_side() {
        let cube = cube_with_face(3.0, 1);
        assert!((selection_radius(&cube) - 1.5).abs() < 1e-12);
        let c = selection_centroid(&cube).unwrap();
        assert!((c - Point3::new(0.0, 0.0, 1.5)).norm() < 1e-12);
    }

    #[test]
    fn radius_without_outer_edges_is_zero() {
        let mut cube = Mesh::cube(1.0);
        cube.select_all();
        assert_eq!(selection_radius(&cube), 0.0);
    }

    #[test]
    fn radius_takes_nearest_outer_edge_line() {
        let mut mesh = Mesh::from_polygons(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 2.0, 0.0),
                Point3::new(4.0, 2.0, 0.0),
            ],
            &[vec![0, 1, 2, 3], vec![3, 2, 5, 4]],
        )
        .unwrap();
        mesh.select_polygon(PolygonId::from(0));
        // Edge 3-2 is shared: line distance 0.5 beats half length 2.0.
        assert!((selection_radius(&mesh) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn radius_takes_half_edge_when_shorter() {
        // Trapezoid whose short top edge is shared with a neighbour.
        let mut mesh = Mesh::from_polygons(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(3.0, 4.0, 0.0),
                Point3::new(1.0, 4.0, 0.0),
                Point3::new(1.0, 5.0, 0.0),
                Point3::new(3.0, 5.0, 0.0),
            ],
            &[vec![0, 1, 2, 3], vec![3, 2, 5, 4]],
        )
        .unwrap();
        mesh.select_polygon(PolygonId::from(0));
        // Centroid (2, 2): top line is 2 away, slanted sides 6/sqrt(17), half of edge 3-2 is 1.
        assert!((selection_radius(&mesh) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn outer_edges_of_cube_face() {
        let cube = cube_with_face(2.5, 0);
        assert!((shortest_outer_edge_length(&cube).unwrap() - 2.5).abs() < 1e-12);
        assert!((average_outer_edge_length(&cube) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn interior_edges_yield_sentinels() {
        let mut cube = Mesh::cube(1.0);
        cube.select_all();
        assert_eq!(shortest_outer_edge_length(&cube), None);
        assert_eq!(average_outer_edge_length(&cube), 0.0);

        let unselected = Mesh::cube(1.0);
        assert_eq!(shortest_outer_edge_length(&unselected), None);
        assert_eq!(average_outer_edge_length(&unselected), 0.0);
    }

    #[test]
    fn shortest_picks_minimum_over_mixed_lengths() {
        // Rectangle 2 x 1 selected inside a fan of unselected neighbours.
        let mut mesh = Mesh::from_polygons(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(3.0, 0.5, 0.0),
            ],
            &[vec![0, 1, 2, 3], vec![0, 4, 1], vec![1, 5, 2]],
        )
        .unwrap();
        mesh.select_polygon(PolygonId::from(0));
        assert!((shortest_outer_edge_length(&mesh).unwrap() - 1.0).abs() < 1e-12);
        // Edges 0-1 (2.0) and 1-2 (1.0) border a neighbour; 2-3 and 3-0 do not.
        assert!((average_outer_edge_length(&mesh) - 1.5).abs() < 1e-12);
    }
}
