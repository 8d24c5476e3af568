use id_arena::Id;

use crate::mesh::Mesh;

pub type SceneModelId = Id<SceneModel>;

/// A mesh owned by the scene, shared by every object that instances it.
pub struct SceneModel {
    pub mesh: Mesh,
}

impl SceneModel {
    pub fn new(mesh: Mesh) -> Self {
        Self { mesh }
    }
}
