//! Selection filters over mesh elements.

use serde::{Deserialize, Serialize};

use crate::idx::{ElementId, ElementStore};
use crate::mesh::{EdgeId, Mesh, PolygonId, Selectable, VertexId};

/// Which half of a selection to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectMode {
    #[default]
    Selected,
    Deselected,
}

impl SelectMode {
    fn accepts(self, selected: bool) -> bool {
        match self {
            SelectMode::Selected => selected,
            SelectMode::Deselected => !selected,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Vertices,
    Edges,
    Polygons,
}

/// Ids of one element kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementIds {
    Vertices(Vec<VertexId>),
    Edges(Vec<EdgeId>),
    Polygons(Vec<PolygonId>),
}

impl ElementIds {
    pub fn len(&self) -> usize {
        match self {
            ElementIds::Vertices(v) => v.len(),
            ElementIds::Edges(e) => e.len(),
            ElementIds::Polygons(p) => p.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn filter_ids<I: ElementId, T: Selectable>(store: &ElementStore<I, T>, mode: SelectMode) -> Vec<I> {
    store
        .iter()
        .filter(|(_, item)| mode.accepts(item.is_selected()))
        .map(|(id, _)| id)
        .collect()
}

fn any_in<I: ElementId, T: Selectable>(store: &ElementStore<I, T>, mode: SelectMode) -> bool {
    store.values().any(|item| mode.accepts(item.is_selected()))
}

pub fn selected_vertices(mesh: &Mesh, mode: SelectMode) -> Vec<VertexId> {
    filter_ids(&mesh.vertices, mode)
}

pub fn selected_edges(mesh: &Mesh, mode: SelectMode) -> Vec<EdgeId> {
    filter_ids(&mesh.edges, mode)
}

pub fn selected_polygons(mesh: &Mesh, mode: SelectMode) -> Vec<PolygonId> {
    filter_ids(&mesh.polygons, mode)
}

pub fn selected_ids(mesh: &Mesh, kind: ElementKind, mode: SelectMode) -> ElementIds {
    match kind {
        ElementKind::Vertices => ElementIds::Vertices(selected_vertices(mesh, mode)),
        ElementKind::Edges => ElementIds::Edges(selected_edges(mesh, mode)),
        ElementKind::Polygons => ElementIds::Polygons(selected_polygons(mesh, mode)),
    }
}

/// Whether any element of `kind` falls in the `mode` half of the selection.
pub fn has_selected(mesh: &Mesh, kind: ElementKind, mode: SelectMode) -> bool {
    match kind {
        ElementKind::Vertices => any_in(&mesh.vertices, mode),
        ElementKind::Edges => any_in(&mesh.edges, mode),
        ElementKind::Polygons => any_in(&mesh.polygons, mode),
    }
}

pub fn contains_selected_item<T: Selectable>(items: impl IntoIterator<Item = T>) -> bool {
    items.into_iter().any(|item| item.is_selected())
}

/// Snapshot of the selected ids of every element kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshSelection {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub polygons: Vec<PolygonId>,
}

impl MeshSelection {
    pub fn capture(mesh: &Mesh) -> Self {
        Self {
            vertices: selected_vertices(mesh, SelectMode::Selected),
            edges: selected_edges(mesh, SelectMode::Selected),
            polygons: selected_polygons(mesh, SelectMode::Selected),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_with_top() -> Mesh {
        let mut mesh = Mesh::cube(1.0);
        mesh.select_polygon(PolygonId::from(1));
        mesh
    }

    #[test]
    fn selected_and_deselected_partition_the_mesh() {
        let mesh = cube_with_top();
        let sel = selected_vertices(&mesh, SelectMode::Selected);
        let desel = selected_vertices(&mesh, SelectMode::Deselected);
        assert_eq!(sel.len(), 4);
        assert_eq!(desel.len(), 4);
        assert_eq!(selected_edges(&mesh, SelectMode::Selected).len(), 4);
        assert_eq!(selected_edges(&mesh, SelectMode::Deselected).len(), 8);
        assert_eq!(selected_polygons(&mesh, SelectMode::Selected), vec![PolygonId::from(1)]);
        assert_eq!(selected_polygons(&mesh, SelectMode::Deselected).len(), 5);
    }

    #[test]
    fn selected_ids_matches_kind() {
        let mesh = cube_with_top();
        let ids = selected_ids(&mesh, ElementKind::Edges, SelectMode::Selected);
        assert!(matches!(ids, ElementIds::Edges(ref e) if e.len() == 4));
        assert!(!ids.is_empty());
    }

    #[test]
    fn has_selected_respects_mode() {
        let mut mesh = Mesh::cube(1.0);
        assert!(!has_selected(&mesh, ElementKind::Polygons, SelectMode::Selected));
        assert!(has_selected(&mesh, ElementKind::Polygons, SelectMode::Deselected));
        mesh.select_all();
        assert!(has_selected(&mesh, ElementKind::Vertices, SelectMode::Selected));
        assert!(!has_selected(&mesh, ElementKind::Edges, SelectMode::Deselected));
    }

    #[test]
    fn contains_selected_item_over_references() {
        let mesh = cube_with_top();
        assert!(contains_selected_item(mesh.polygons.values()));
        assert!(!contains_selected_item(Vec::<&crate::mesh::MeshEdge>::new()));
    }

    #[test]
    fn capture_snapshots_every_kind() {
        let mesh = cube_with_top();
        let snapshot = MeshSelection::capture(&mesh);
        assert_eq!(snapshot.vertices.len(), 4);
        assert_eq!(snapshot.edges.len(), 4);
        assert_eq!(snapshot.polygons.len(), 1);
        assert!(MeshSelection::capture(&Mesh::cube(1.0)).is_empty());
    }
}
