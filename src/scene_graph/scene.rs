use glam::{Mat4, Vec3};
use id_arena::Arena;

use crate::lights::Light;
use crate::loader::{AssetNode, ModelAsset};
use crate::model::Model;
use crate::scene_graph::object3d::{Object3D, ObjectId, ObjectKind};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
}

/// A mesh node ready to be drawn, with matrices from the last transform update.
pub struct MeshInstance {
    pub model_id: SceneModelId,
    pub world_matrix: Mat4,
    pub normal_matrix: Mat4,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Allocates `object` and parents it to `parent`.
    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent));
        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    #[allow(dead_code)]
    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn add_model(&mut self, model: Model) -> SceneModelId {
        self.models.alloc(SceneModel::new(model))
    }

    /// Attaches a decoded asset under `mount` as a single wrapper node named
    /// `name`. The whole hierarchy is built within this call, so a frame
    /// never observes a partially attached model.
    pub fn attach_asset(&mut self, mount: ObjectId, name: &str, asset: ModelAsset) -> ObjectId {
        let ModelAsset { models, roots } = asset;

        let model_ids = models
            .into_iter()
            .map(|model| self.add_model(model))
            .collect::<Vec<SceneModelId>>();

        let wrapper = self.add_object(Object3D::group(name));

        for node in roots {
            self.spawn_asset_node(node, wrapper, &model_ids);
        }

        // Parent last: the wrapper only becomes reachable from the mount once
        // its subtree is complete.
        self.set_object_parent(wrapper, Some(mount));

        wrapper
    }

    fn spawn_asset_node(
        &mut self,
        node: AssetNode,
        parent: ObjectId,
        model_ids: &[SceneModelId],
    ) -> ObjectId {
        let kind = match node.mesh.and_then(|index| model_ids.get(index)) {
            Some(model_id) => ObjectKind::Mesh(*model_id),
            None => ObjectKind::Group,
        };

        let object = Object3D {
            name: node.name,
            transform: Transform::new(node.translation, node.rotation, node.scale),
            kind,
            cast_shadow: true,
            ..Default::default()
        };

        let object_id = self.add_child(parent, object);

        for child in node.children {
            self.spawn_asset_node(child, object_id, model_ids);
        }

        object_id
    }

    /// Updates all object transforms in hierarchical order
    pub fn update_transforms(&self) {
        let root_objects = self.objects.iter().filter_map(|(id, object)| {
            if object.parent_id.is_none() {
                Some(id)
            } else {
                None
            }
        });

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY);
        }
    }

    /// Recursively updates an object's world transform and its children
    fn update_object_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                let world_matrix = parent_world_matrix * local_matrix;
                object.transform.set_world_matrix(world_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
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

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn mesh_instances(&self) -> impl Iterator<Item = MeshInstance> + '_ {
        self.objects
            .iter()
            .filter_map(|(_, object)| match object.kind {
                ObjectKind::Mesh(model_id) => Some(MeshInstance {
                    model_id,
                    world_matrix: *object.transform.get_world_matrix(),
                    normal_matrix: *object.transform.get_inverse_transpose_world_matrix(),
                }),
                _ => None,
            })
    }

    /// Nodes flagged to cast shadows.
    pub fn shadow_casters(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .filter(|(_, object)| object.cast_shadow)
            .map(|(id, _)| id)
    }

    /// Lights paired with their world-space positions.
    pub fn lights(&self) -> impl Iterator<Item = (Light, Vec3)> + '_ {
        self.objects
            .iter()
            .filter_map(|(_, object)| match object.kind {
                ObjectKind::Light(light) => Some((light, object.transform.world_position())),
                _ => None,
            })
    }
}
