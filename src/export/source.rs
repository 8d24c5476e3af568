use anyhow::Context;
use glam::Mat4;

use crate::mesh::Mesh;
use crate::scene_graph::{ObjectId, Scene};

/// Read-only view of a scene as seen by the exporter.
///
/// The exporter never mutates the scene, so implementations only hand out
/// shared borrows.
pub trait SceneSource {
    type ObjectId: Copy;

    /// All objects in scene order, selected or not.
    fn object_ids(&self) -> Vec<Self::ObjectId>;

    fn object_name(&self, id: Self::ObjectId) -> &str;

    fn is_selected(&self, id: Self::ObjectId) -> bool;

    fn world_matrix(&self, id: Self::ObjectId) -> Mat4;

    /// Mesh data of an object. An error here skips the object, it does not
    /// abort the export.
    fn mesh(&self, id: Self::ObjectId) -> anyhow::Result<&Mesh>;
}

impl SceneSource for Scene {
    type ObjectId = ObjectId;

    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|(id, _)| id).collect()
    }

    fn object_name(&self, id: ObjectId) -> &str {
        self.get_object(id)
            .map(|object| object.name.as_str())
            .unwrap_or("")
    }

    fn is_selected(&self, id: ObjectId) -> bool {
        self.get_object(id).is_some_and(|object| object.selected)
    }

    fn world_matrix(&self, id: ObjectId) -> Mat4 {
        Scene::world_matrix(self, id)
    }

    fn mesh(&self, id: ObjectId) -> anyhow::Result<&Mesh> {
        let object = self.get_object(id).context("Object not found in scene")?;
        let model_id = object
            .model_id
            .with_context(|| format!("Object {} has no mesh", object.name))?;
        let model = self
            .get_model(model_id)
            .with_context(|| format!("Mesh of object {} not found in scene", object.name))?;

        Ok(&model.mesh)
    }
}
