use anyhow::Context;
use glam::Vec3;
use gltf::buffer;

/// Material index carried by faces that have no material assigned.
pub const UNASSIGNED_MATERIAL: usize = usize::MAX;

pub const DEFAULT_COLOR: Vec3 = Vec3::ONE;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub vertices: Vec<u32>,
    pub material_index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Vec3,
}

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub materials: Vec<Material>,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        self.vertices.push(Vertex { position, normal });
        (self.vertices.len() - 1) as u32
    }

    pub fn add_face(&mut self, vertices: &[u32], material_index: usize) {
        self.faces.push(Face {
            vertices: vertices.to_vec(),
            material_index,
        });
    }

    pub fn add_material(&mut self, name: impl Into<String>, color: Vec3) -> usize {
        self.materials.push(Material {
            name: name.into(),
            color,
        });
        self.materials.len() - 1
    }

    /// Flat color for a face's material index, white when the index is out of range.
    pub fn material_color(&self, material_index: usize) -> Vec3 {
        self.materials
            .get(material_index)
            .map(|material| material.color)
            .unwrap_or(DEFAULT_COLOR)
    }

    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Mesh> {
        let mut result = Mesh::new(name);
        // glTF material index -> index in this mesh's material list
        let mut material_slots: Vec<(usize, usize)> = Vec::new();

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of mesh {}: unsupported mode {:?}",
                    primitive.index(),
                    result.name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions = reader.read_positions().with_context(|| {
                format!("Primitive {} of {} has no positions", primitive.index(), result.name)
            })?;
            let normals = reader.read_normals().with_context(|| {
                format!("Primitive {} of {} has no normals", primitive.index(), result.name)
            })?;

            let first_vertex = result.vertices.len() as u32;
            for (position, normal) in positions.zip(normals) {
                result.add_vertex(Vec3::from(position), Vec3::from(normal));
            }
            let vertex_count = result.vertices.len() as u32 - first_vertex;

            let material = primitive.material();
            let material_index = match material.index() {
                Some(gltf_index) => match material_slots.iter().find(|(g, _)| *g == gltf_index) {
                    Some(&(_, slot)) => slot,
                    None => {
                        let name = material.name().unwrap_or("Unnamed material");
                        let [r, g, b, _] = material.pbr_metallic_roughness().base_color_factor();
                        let slot = result.add_material(name, Vec3::new(r, g, b));
                        material_slots.push((gltf_index, slot));
                        slot
                    }
                },
                None => UNASSIGNED_MATERIAL,
            };

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..vertex_count).collect(),
            };

            for (triangle_index, triangle) in indices.chunks_exact(3).enumerate() {
                match offset_triangle(triangle, first_vertex, vertex_count) {
                    Some(face) => result.add_face(&face, material_index),
                    None => log::warn!(
                        "Skipping triangle {} of primitive {} in {}: indices {:?} outside its {} vertices",
                        triangle_index,
                        primitive.index(),
                        result.name,
                        triangle,
                        vertex_count
                    ),
                }
            }
        }

        if result.faces.is_empty() {
            return Err(anyhow::anyhow!("Mesh without triangle faces: {}", result.name));
        }

        Ok(result)
    }
}

/// Moves a primitive-local triangle into mesh vertex space. Indices must
/// stay inside the primitive's own vertices.
fn offset_triangle(triangle: &[u32], first_vertex: u32, vertex_count: u32) -> Option<[u32; 3]> {
    let mut face = [0; 3];
    for (slot, &index) in face.iter_mut().zip(triangle) {
        if index >= vertex_count {
            return None;
        }
        *slot = first_vertex.checked_add(index)?;
    }
    Some(face)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_color_falls_back_to_white() {
        let mut mesh = Mesh::new("Cube");
        assert_eq!(mesh.material_color(0), DEFAULT_COLOR);

        let red = mesh.add_material("Red", Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.material_color(red), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.material_color(red + 1), DEFAULT_COLOR);
        assert_eq!(mesh.material_color(UNASSIGNED_MATERIAL), DEFAULT_COLOR);
    }

    #[test]
    fn add_vertex_returns_sequential_indices() {
        let mut mesh = Mesh::new("Strip");
        assert_eq!(mesh.add_vertex(Vec3::ZERO, Vec3::Z), 0);
        assert_eq!(mesh.add_vertex(Vec3::X, Vec3::Z), 1);
        mesh.add_face(&[0, 1, 1], 0);
        assert_eq!(mesh.faces[0].vertices, vec![0, 1, 1]);
    }

    #[test]
    fn offset_triangle_stays_inside_its_primitive() {
        assert_eq!(offset_triangle(&[0, 1, 2], 3, 3), Some([3, 4, 5]));
        assert_eq!(offset_triangle(&[0, 1, 5], 0, 3), None);
        assert_eq!(offset_triangle(&[0, 1, u32::MAX], 3, 3), None);
        assert_eq!(offset_triangle(&[0, 1, 2], u32::MAX - 1, 3), None);
    }
}
