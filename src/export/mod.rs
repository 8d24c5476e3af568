pub mod record;
pub mod source;
pub mod triangulate;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::config::ExportConfig;
use crate::mesh::{Mesh, Vertex};

pub use record::TriangleRecord;
pub use source::SceneSource;
pub use triangulate::{triangulate_face, FaceError, Triangulation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub objects_exported: usize,
    pub objects_skipped: usize,
    pub faces_skipped: usize,
    pub triangles_written: usize,
}

/// Creates (or truncates) `path` and writes every selected mesh into it.
///
/// Failing to create the file aborts before any export work. The file is
/// closed on every path, including write errors halfway through.
pub fn export_geometry<S: SceneSource>(
    scene: &S,
    path: &Path,
    config: &ExportConfig,
) -> anyhow::Result<ExportSummary> {
    let file = File::create(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    let mut writer = BufWriter::new(file);

    let summary = write_geometry(scene, &mut writer, config)
        .with_context(|| format!("Failed to export geometry to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!(
        "Exported {} triangles from {} objects to {} ({} objects and {} faces skipped)",
        summary.triangles_written,
        summary.objects_exported,
        path.display(),
        summary.objects_skipped,
        summary.faces_skipped
    );

    Ok(summary)
}

/// Single read-only pass over the scene: selected objects, then faces, then
/// triangles, one line per triangle.
pub fn write_geometry<S: SceneSource, W: Write>(
    scene: &S,
    writer: &mut W,
    config: &ExportConfig,
) -> anyhow::Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    for id in scene.object_ids() {
        if !scene.is_selected(id) {
            continue;
        }

        let name = scene.object_name(id);
        let mesh = match scene.mesh(id) {
            Ok(mesh) => mesh,
            Err(error) => {
                log::warn!("Skipping object {}: {:#}", name, error);
                summary.objects_skipped += 1;
                continue;
            }
        };

        log::debug!(
            "Exporting object {} (mesh {}, {} faces)",
            name,
            mesh.name,
            mesh.faces.len()
        );

        let world_vertices = world_space_vertices(mesh, &scene.world_matrix(id));

        for (face_index, face) in mesh.faces.iter().enumerate() {
            let triangulation = match triangulate_face(&face.vertices, world_vertices.len()) {
                Ok(triangulation) => triangulation,
                Err(error) => {
                    log::warn!("Skipping face {} of {}: {}", face_index, name, error);
                    summary.faces_skipped += 1;
                    continue;
                }
            };

            let color = mesh.material_color(face.material_index);

            for triangle in triangulation.triangles() {
                let record = TriangleRecord {
                    vertices: triangle.map(|index| world_vertices[index as usize]),
                    color,
                };
                record.write_line(writer, config.precision)?;
                summary.triangles_written += 1;
            }
        }

        summary.objects_exported += 1;
    }

    Ok(summary)
}

/// Positions take the full matrix, normals ignore its translation.
fn world_space_vertices(mesh: &Mesh, world_matrix: &glam::Mat4) -> Vec<Vertex> {
    mesh.vertices
        .iter()
        .map(|vertex| Vertex {
            position: world_matrix.transform_point3(vertex.position),
            normal: world_matrix.transform_vector3(vertex.normal),
        })
        .collect()
}
