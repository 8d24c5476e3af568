use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use glam::{Mat4, Quat};
use id_arena::Arena;

use crate::mesh::{Buffers, Mesh};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    gltf_mesh_to_model: HashMap<usize, Option<SceneModelId>>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            gltf_mesh_to_model: HashMap::new(),
        }
    }

    /// Imports a glTF or GLB file and spawns one of its scenes.
    ///
    /// Uses `scene_index` when given, otherwise the document's default scene,
    /// otherwise the first one.
    pub fn from_gltf_file(path: &Path, scene_index: Option<usize>) -> anyhow::Result<Self> {
        let (document, buffers, _images) = gltf::import(path)
            .with_context(|| format!("Failed to import glTF file {}", path.display()))?;

        let gltf_scene = match scene_index {
            Some(index) => document.scenes().nth(index).with_context(|| {
                format!(
                    "Scene {} not found in {} ({} scenes)",
                    index,
                    path.display(),
                    document.scenes().len()
                )
            })?,
            None => document
                .default_scene()
                .or_else(|| document.scenes().next())
                .with_context(|| format!("No scenes in {}", path.display()))?,
        };

        let mut scene = Scene::new();
        scene.spawn_gltf_scene(&buffers, &gltf_scene);

        log::info!(
            "Loaded scene {} from {}: {} objects, {} meshes",
            gltf_scene.name().unwrap_or("(unnamed)"),
            path.display(),
            scene.objects.len(),
            scene.models.len()
        );

        Ok(scene)
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    pub fn get_model(&self, id: SceneModelId) -> Option<&SceneModel> {
        self.models.get(id)
    }

    pub fn spawn_gltf_scene(&mut self, buffers: Buffers, scene: &gltf::Scene) {
        for node in scene.nodes() {
            self.spawn_gltf_node(buffers, &node, None);
        }
    }

    fn spawn_gltf_node(
        &mut self,
        buffers: Buffers,
        node: &gltf::Node,
        parent: Option<ObjectId>,
    ) {
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        let (translation, rotation, scale) = node.transform().decomposed();

        let mut object = Object3D::new(node_name.clone())
            .with_transform(Transform::from_trs(
                translation.into(),
                Quat::from_array(rotation),
                scale.into(),
            ))
            .selected(node_selected(node));

        if let Some(mesh) = node.mesh() {
            let mesh_index = mesh.index();

            let model_id = match self.gltf_mesh_to_model.get(&mesh_index).copied() {
                Some(model_id) => model_id,
                None => {
                    let mesh_name = mesh
                        .name()
                        .map(String::from)
                        .unwrap_or_else(|| format!("{} (Mesh)", node_name));

                    // A mesh that fails to load leaves its objects without a mesh;
                    // the exporter reports and skips them.
                    let model_id = match Mesh::from_gltf(mesh_name.clone(), mesh, buffers) {
                        Ok(mesh) => Some(self.add_model(SceneModel::new(mesh))),
                        Err(error) => {
                            log::warn!("Failed to load mesh {}: {:#}", mesh_name, error);
                            None
                        }
                    };
                    self.gltf_mesh_to_model.insert(mesh_index, model_id);

                    model_id
                }
            };

            object.model_id = model_id;
        }

        let object_id = self.add_object(object);

        if let Some(parent_id) = parent {
            self.set_object_parent(object_id, Some(parent_id));
        }

        for child in node.children() {
            self.spawn_gltf_node(buffers, &child, Some(object_id));
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }
    }

    /// Product of the local matrices from the root down to the object.
    pub fn world_matrix(&self, object_id: ObjectId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = self.objects.get(object_id);

        while let Some(object) = current {
            matrix = object.transform.local_matrix() * matrix;
            current = object.parent_id.and_then(|id| self.objects.get(id));
        }

        matrix
    }

    pub fn select_all(&mut self) {
        for (_, object) in self.objects.iter_mut() {
            object.selected = true;
        }
    }

    /// Selects exactly the objects with the given names and returns the
    /// names that matched no object.
    pub fn select_by_names<'a>(&mut self, names: &'a [String]) -> Vec<&'a str> {
        for (_, object) in self.objects.iter_mut() {
            object.selected = names.iter().any(|name| *name == object.name);
        }

        names
            .iter()
            .filter(|name| self.get_object_by_name(name).is_none())
            .map(String::as_str)
            .collect()
    }

    pub fn selected_objects(&self) -> impl Iterator<Item = (ObjectId, &Object3D)> {
        self.objects.iter().filter(|(_, object)| object.selected)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Selection flag stored in a node's extras by the authoring tool, e.g.
/// `{"selected": true}` or `{"selected": 1}`.
fn node_selected(node: &gltf::Node) -> bool {
    let Some(extras) = node.extras() else {
        return false;
    };

    match serde_json::from_str::<serde_json::Value>(extras.get()) {
        Ok(value) => match value.get("selected") {
            Some(serde_json::Value::Bool(selected)) => *selected,
            Some(serde_json::Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        },
        Err(error) => {
            log::warn!(
                "Ignoring malformed extras on node {}: {}",
                node.name().unwrap_or("Unnamed"),
                error
            );
            false
        }
    }
}
