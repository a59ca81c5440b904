//! OBJ import and export.
//!
//! Only positions and polygon loops are carried; texture and normal indices
//! are dropped on load and never written. Normals are recomputed from the
//! loops.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use nalgebra::Point3;
use obj::{Group, IndexTuple, ObjData, Object, SimplePolygon};
use tracing::info;

use crate::error::SnetResult;
use crate::mesh::Mesh;

pub fn load_obj(path: impl AsRef<Path>) -> SnetResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = read_obj(BufReader::new(file))?;
    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        polygons = mesh.polygons.len(),
        "Loaded OBJ"
    );
    Ok(mesh)
}

pub fn read_obj<R: Read>(input: R) -> SnetResult<Mesh> {
    let data = ObjData::load_buf(input)?;
    mesh_from_obj(&data)
}

pub fn save_obj(mesh: &Mesh, path: impl AsRef<Path>) -> SnetResult<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut out)?;
    out.flush()?;
    info!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        polygons = mesh.polygons.len(),
        "Saved OBJ"
    );
    Ok(())
}

pub fn write_obj<W: Write>(mesh: &Mesh, out: &mut W) -> SnetResult<()> {
    obj_from_mesh(mesh, "Surface").write_to_buf(out)?;
    Ok(())
}

/// Every polygon of every object and group, in file order.
pub fn mesh_from_obj(data: &ObjData) -> SnetResult<Mesh> {
    let positions: Vec<Point3<f64>> = data
        .position
        .iter()
        .map(|&[x, y, z]| Point3::new(f64::from(x), f64::from(y), f64::from(z)))
        .collect();
    let loops: Vec<Vec<usize>> = data
        .objects
        .iter()
        .flat_map(|o| o.groups.iter())
        .flat_map(|g| g.polys.iter())
        .map(|p| p.0.iter().map(|t| t.0).collect())
        .collect();
    Mesh::from_polygons(&positions, &loops)
}

pub fn obj_from_mesh(mesh: &Mesh, name: &str) -> ObjData {
    let position = mesh
        .vertices
        .values()
        .map(|v| [v.co.x as f32, v.co.y as f32, v.co.z as f32])
        .collect();

    let mut group = Group::new(name.to_string());
    group.polys = mesh
        .polygons
        .values()
        .map(|p| {
            SimplePolygon(
                p.vertices
                    .iter()
                    .map(|&v| IndexTuple(v.into(), None, None))
                    .collect(),
            )
        })
        .collect();

    let mut object = Object::new(name.to_string());
    object.groups.push(group);

    ObjData {
        position,
        texture: vec![],
        normal: vec![],
        objects: vec![object],
        material_libs: vec![],
    }
}
