use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triangulation {
    Triangle([u32; 3]),
    Quad([u32; 3], [u32; 3]),
}

impl Triangulation {
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> {
        let (first, second) = match *self {
            Triangulation::Triangle(a) => (a, None),
            Triangulation::Quad(a, b) => (a, Some(b)),
        };

        std::iter::once(first).chain(second)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaceError {
    #[error("face has {0} vertices, expected 3 or 4")]
    UnsupportedVertexCount(usize),

    #[error("face references vertex {index} but the mesh has {vertex_count} vertices")]
    VertexOutOfRange { index: u32, vertex_count: usize },
}

/// Splits a face into triangles without touching the source mesh.
///
/// Quads (v0, v1, v2, v3) become (v3, v1, v0) and (v1, v2, v3).
pub fn triangulate_face(face: &[u32], vertex_count: usize) -> Result<Triangulation, FaceError> {
    if let Some(&index) = face.iter().find(|&&index| index as usize >= vertex_count) {
        return Err(FaceError::VertexOutOfRange {
            index,
            vertex_count,
        });
    }

    match *face {
        [v0, v1, v2] => Ok(Triangulation::Triangle([v0, v1, v2])),
        [v0, v1, v2, v3] => Ok(Triangulation::Quad([v3, v1, v0], [v1, v2, v3])),
        _ => Err(FaceError::UnsupportedVertexCount(face.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_keeps_vertex_order() {
        let triangulation = triangulate_face(&[2, 0, 1], 3).unwrap();
        assert_eq!(triangulation.triangles().collect::<Vec<_>>(), vec![[2, 0, 1]]);
    }

    #[test]
    fn quad_uses_fan_order() {
        let triangulation = triangulate_face(&[0, 1, 2, 3], 4).unwrap();
        assert_eq!(
            triangulation.triangles().collect::<Vec<_>>(),
            vec![[3, 1, 0], [1, 2, 3]]
        );
    }

    #[test]
    fn other_vertex_counts_are_rejected() {
        assert_eq!(
            triangulate_face(&[0, 1], 5),
            Err(FaceError::UnsupportedVertexCount(2))
        );
        assert_eq!(
            triangulate_face(&[0, 1, 2, 3, 4], 5),
            Err(FaceError::UnsupportedVertexCount(5))
        );
        assert_eq!(
            triangulate_face(&[], 5),
            Err(FaceError::UnsupportedVertexCount(0))
        );
        assert_eq!(
            FaceError::UnsupportedVertexCount(2).to_string(),
            "face has 2 vertices, expected 3 or 4"
        );
    }

    #[test]
    fn out_of_range_vertices_are_rejected() {
        let error = triangulate_face(&[0, 1, 7], 3).unwrap_err();
        assert_eq!(
            error,
            FaceError::VertexOutOfRange {
                index: 7,
                vertex_count: 3
            }
        );
        assert_eq!(
            error.to_string(),
            "face references vertex 7 but the mesh has 3 vertices"
        );
    }
}
