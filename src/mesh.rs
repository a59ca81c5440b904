use std::collections::HashMap;

use derive_more::{Display, From, Into};
use nalgebra::{Point3, Vector3};

use crate::error::{SnetError, SnetResult};
use crate::idx::{ElementId, ElementStore};

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, From, Into, Display)]
#[display(fmt = "polygon {}", _0)]
pub struct PolygonId(usize);

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, From, Into, Display)]
#[display(fmt = "vertex {}", _0)]
pub struct VertexId(usize);

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, From, Into, Display)]
#[display(fmt = "edge {}", _0)]
pub struct EdgeId(usize);

impl ElementId for PolygonId {}
impl ElementId for VertexId {}
impl ElementId for EdgeId {}

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Corner {
    pub polygon: PolygonId,
    pub index: usize,
}

/// Anything carrying a selection flag.
pub trait Selectable {
    fn is_selected(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct MeshVertex {
    pub co: Point3<f64>,
    pub select: bool,
}

#[derive(Clone, Debug)]
pub struct MeshEdge {
    pub vertices: [VertexId; 2],
    pub select: bool,
}

#[derive(Clone, Debug)]
pub struct MeshPolygon {
    pub vertices: Vec<VertexId>,
    pub normal: Vector3<f64>,
    pub select: bool,
}

impl Selectable for MeshVertex {
    fn is_selected(&self) -> bool {
        self.select
    }
}

impl Selectable for MeshEdge {
    fn is_selected(&self) -> bool {
        self.select
    }
}

impl Selectable for MeshPolygon {
    fn is_selected(&self) -> bool {
        self.select
    }
}

impl<T: Selectable> Selectable for &T {
    fn is_selected(&self) -> bool {
        (*self).is_selected()
    }
}

/// A polygon mesh with per-element selection flags.
///
/// Edges are derived from the polygon loops when the mesh is built, one per
/// unordered vertex pair.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: ElementStore<VertexId, MeshVertex>,
    pub edges: ElementStore<EdgeId, MeshEdge>,
    pub polygons: ElementStore<PolygonId, MeshPolygon>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
}

pub struct PolygonCornersIter {
    polygon: PolygonId,
    index: usize,
    count: usize,
}

impl Iterator for PolygonCornersIter {
    type Item = Corner;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(Corner {
            polygon: self.polygon,
            index,
        })
    }
}

fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from positions and polygon loops given as vertex indices.
    ///
    /// Normals are computed and edges derived. Nothing starts selected.
    pub fn from_polygons(positions: &[Point3<f64>], loops: &[Vec<usize>]) -> SnetResult<Self> {
        let mut mesh = Mesh::new();
        for p in positions {
            mesh.add_vertex(*p);
        }
        for l in loops {
            let ids = l.iter().map(|&i| VertexId::from(i)).collect();
            mesh.add_polygon(ids)?;
        }
        Ok(mesh)
    }

    pub fn add_vertex(&mut self, co: Point3<f64>) -> VertexId {
        self.vertices.push(MeshVertex { co, select: false })
    }

    /// Append a polygon, creating any edges its loop introduces.
    pub fn add_polygon(&mut self, vertices: Vec<VertexId>) -> SnetResult<PolygonId> {
        let id = PolygonId::from(self.polygons.len());
        validate_loop(self, id, &vertices)?;
        Ok(self.push_polygon(vertices))
    }

    /// Append a loop already known to be well formed.
    fn push_polygon(&mut self, vertices: Vec<VertexId>) -> PolygonId {
        let polygon = self.polygons.push(MeshPolygon {
            vertices,
            normal: Vector3::zeros(),
            select: false,
        });
        let normal = polygon.compute_normal(self);
        self.polygons[polygon].normal = normal;
        for corner in polygon.corners(self).collect::<Vec<_>>() {
            let a = corner.to_vertex(self);
            let b = corner.next(self).to_vertex(self);
            self.ensure_edge(a, b);
        }
        polygon
    }

    fn ensure_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let key = edge_key(a, b);
        if let Some(&e) = self.edge_lookup.get(&key) {
            return e;
        }
        let e = self.edges.push(MeshEdge {
            vertices: [a, b],
            select: false,
        });
        self.edge_lookup.insert(key, e);
        e
    }

    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(a, b)).copied()
    }

    /// Select a polygon together with its vertices and edges.
    pub fn select_polygon(&mut self, polygon: PolygonId) {
        self.polygons[polygon].select = true;
        for corner in polygon.corners(self).collect::<Vec<_>>() {
            let a = corner.to_vertex(self);
            let b = corner.next(self).to_vertex(self);
            self.vertices[a].select = true;
            if let Some(e) = self.find_edge(a, b) {
                self.edges[e].select = true;
            }
        }
    }

    pub fn select_all(&mut self) {
        self.set_selection(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_selection(false);
    }

    fn set_selection(&mut self, select: bool) {
        for v in self.vertices.values_mut() {
            v.select = select;
        }
        for e in self.edges.values_mut() {
            e.select = select;
        }
        for p in self.polygons.values_mut() {
            p.select = select;
        }
    }

    /// An axis-aligned cube of side `size` centred on the origin, quads wound
    /// counter-clockwise seen from outside.
    pub fn cube(size: f64) -> Self {
        let h = size * 0.5;
        let positions = [
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ];
        let mut mesh = Mesh::new();
        for p in positions {
            mesh.add_vertex(p);
        }
        for l in [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [2, 3, 7, 6],
            [0, 4, 7, 3],
            [1, 2, 6, 5],
        ] {
            mesh.push_polygon(l.iter().map(|&i| VertexId::from(i)).collect());
        }
        mesh
    }
}

fn validate_loop(mesh: &Mesh, polygon: PolygonId, vertices: &[VertexId]) -> SnetResult<()> {
    if vertices.len() < 3 {
        return Err(SnetError::invalid_mesh(format!(
            "{polygon} has {} corners",
            vertices.len()
        )));
    }
    for v in vertices {
        if !v.is_valid(mesh) {
            return Err(SnetError::invalid_mesh(format!("{polygon} references missing {v}")));
        }
    }
    for a in 0..(vertices.len() - 1) {
        for b in (a + 1)..vertices.len() {
            if vertices[a] == vertices[b] {
                return Err(SnetError::invalid_mesh(format!(
                    "{polygon} repeats {}",
                    vertices[a]
                )));
            }
        }
    }
    Ok(())
}

impl PolygonId {
    pub fn to_vertices(self, mesh: &Mesh) -> &Vec<VertexId> {
        &mesh.polygons[self].vertices
    }

    pub fn corner_count(&self, mesh: &Mesh) -> usize {
        mesh.polygons[*self].vertices.len()
    }

    pub fn corners(&self, mesh: &Mesh) -> PolygonCornersIter {
        PolygonCornersIter {
            polygon: *self,
            index: 0,
            count: self.corner_count(mesh),
        }
    }

    pub fn first_corner(&self) -> Corner {
        Corner {
            polygon: *self,
            index: 0,
        }
    }

    /// Unit normal from the summed corner cross products, zero when the
    /// polygon has no area.
    pub fn compute_normal(&self, mesh: &Mesh) -> Vector3<f64> {
        let mut n = Vector3::zeros();
        for corner in self.corners(mesh) {
            let a = corner.to_point(mesh).coords;
            let b = corner.next(mesh).to_point(mesh).coords;
            n += a.cross(&b);
        }
        if n.norm_squared() == 0. {
            return n;
        }
        n.normalize_mut();
        n
    }

    /// Mean of the corner positions.
    pub fn center(&self, mesh: &Mesh) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        for corner in self.corners(mesh) {
            sum += corner.to_point(mesh).coords;
        }
        Point3::from(sum / self.corner_count(mesh) as f64)
    }

    pub fn contains_vertex(&self, mesh: &Mesh, v: VertexId) -> bool {
        mesh.polygons[*self].vertices.contains(&v)
    }
}

impl VertexId {
    pub fn to_point(self, mesh: &Mesh) -> &Point3<f64> {
        &mesh.vertices[self].co
    }

    pub fn is_valid(&self, mesh: &Mesh) -> bool {
        mesh.vertices.contains(*self)
    }
}

impl EdgeId {
    pub fn length(&self, mesh: &Mesh) -> f64 {
        let [a, b] = mesh.edges[*self].vertices;
        (a.to_point(mesh) - b.to_point(mesh)).norm()
    }
}

impl Corner {
    pub fn to_vertex(self, mesh: &Mesh) -> VertexId {
        mesh.polygons[self.polygon].vertices[self.index]
    }

    pub fn next(&self, mesh: &Mesh) -> Corner {
        let index = (self.index + 1) % self.polygon.corner_count(mesh);
        Self {
            polygon: self.polygon,
            index,
        }
    }

    pub fn prev(&self, mesh: &Mesh) -> Corner {
        let index = if self.index == 0 {
            self.polygon.corner_count(mesh) - 1
        } else {
            self.index - 1
        };
        Self {
            polygon: self.polygon,
            index,
        }
    }

    pub fn to_point(self, mesh: &Mesh) -> &Point3<f64> {
        self.to_vertex(mesh).to_point(mesh)
    }
}
