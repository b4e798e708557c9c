use crate::{
    camera::Camera,
    config::SceneConfig,
    geometry::{furniture::spawn_furniture, room_shell::RoomShell},
    lights::LightRig,
    loader::{ModelLoader, SceneEvent, SceneEventQueue},
    scene_graph::{
        object3d::{Object3D, ObjectId},
        scene::Scene,
    },
};

/// Owns everything the frame loop draws.
pub struct RoomState {
    pub camera: Camera,
    pub scene: Scene,
    pub room_group: ObjectId,
    events: SceneEventQueue,
}

impl RoomState {
    pub fn new(config: &SceneConfig) -> anyhow::Result<Self> {
        let state = Self::build(config);

        if let Some(path) = &config.model_path {
            ModelLoader::spawn(path.clone(), state.events.sender())?;
        }

        Ok(state)
    }

    /// Builds the static scene without starting any loads.
    fn build(config: &SceneConfig) -> Self {
        let mut scene = Scene::new();

        let room_group = scene.add_object(Object3D::group("Room"));

        RoomShell::new(config.room).spawn(&mut scene, room_group, &config.room_colors);

        let bounds = config.room.bounds();
        for piece in &config.furniture {
            if !bounds.contains_aabb(&piece.bounds()) {
                log::warn!("{} extends outside the room", piece.name);
            }
        }
        spawn_furniture(&mut scene, room_group, &config.furniture);

        LightRig::from_config(&config.lights).spawn(&mut scene);

        let camera = Camera::new(&config.camera, 1, 1);
        if !bounds.contains_point_strictly(camera.eye) {
            log::warn!("Camera at {} is outside the room", camera.eye);
        }
        log::debug!(
            "Camera at {} looking at {} (fov {})",
            camera.eye,
            camera.target,
            camera.fov_degrees()
        );

        scene.update_transforms();

        log::info!(
            "Built {} with {} nodes ({} shadow casters)",
            config.title,
            scene.object_count(),
            scene.shadow_casters().count()
        );

        Self {
            camera,
            scene,
            room_group,
            events: SceneEventQueue::new(),
        }
    }

    /// Applies queued scene events and refreshes world transforms. Called
    /// once per frame, before rendering.
    pub fn update(&mut self) {
        let events = self.events.drain().collect::<Vec<_>>();
        for event in events {
            self.apply_event(event);
        }

        self.scene.update_transforms();
    }

    fn apply_event(&mut self, event: SceneEvent) {
        match event {
            SceneEvent::ModelLoaded { path, asset } => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let model_count = asset.models.len();

                self.scene.attach_asset(self.room_group, &name, asset);

                log::info!(
                    "Attached {} ({} meshes), room now has {} children",
                    name,
                    model_count,
                    self.room_children()
                );
            }
            SceneEvent::ModelFailed { path, error } => {
                log::error!("Error loading room model {}: {:#}", path.display(), error);
            }
        }
    }

    pub fn room_children(&self) -> usize {
        self.scene
            .get_object(self.room_group)
            .map(|room| room.children(&self.scene).count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenePreset;
    use crate::geometry::primitives;
    use crate::loader::{AssetNode, ModelAsset};
    use crate::model::{Material, Model};
    use glam::{Quat, Vec3};
    use std::{path::PathBuf, time::Duration};

    fn furnished() -> SceneConfig {
        SceneConfig::preset(ScenePreset::Furnished)
    }

    fn lamp_asset() -> ModelAsset {
        ModelAsset {
            models: vec![Model::from_mesh(
                "Lamp",
                primitives::cuboid(Vec3::splat(0.2)),
                Material::default(),
            )],
            roots: vec![AssetNode {
                name: "Lamp".to_string(),
                translation: Vec3::new(0.0, 1.0, 0.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
                mesh: Some(0),
                children: Vec::new(),
            }],
        }
    }

    #[test]
    fn furnished_room_contents() {
        let state = RoomState::build(&furnished());

        // 6 surfaces + 4 pieces of furniture
        assert_eq!(state.room_children(), 10);
        // room group, its children and two lights
        assert_eq!(state.scene.object_count(), 13);
        assert_eq!(state.scene.mesh_instances().count(), 10);
        assert_eq!(state.camera.eye, Vec3::new(-1.2, 1.1, 0.1));
        // furniture and the directional light
        assert_eq!(state.scene.shadow_casters().count(), 5);
    }

    #[test]
    fn bare_room_has_no_furniture() {
        let state = RoomState::build(&SceneConfig::preset(ScenePreset::Bare));
        assert_eq!(state.room_children(), 6);
    }

    #[test]
    fn failed_load_leaves_scene_unchanged() {
        let mut state = RoomState::build(&furnished());
        let nodes_before = state.scene.object_count();
        let models_before = state.scene.models.len();

        state
            .events
            .sender()
            .send(SceneEvent::ModelFailed {
                path: PathBuf::from("assets/room.glb"),
                error: anyhow::anyhow!("file not found"),
            })
            .unwrap();
        state.update();

        assert_eq!(state.scene.object_count(), nodes_before);
        assert_eq!(state.scene.models.len(), models_before);
        assert_eq!(state.room_children(), 10);
    }

    #[test]
    fn failed_load_from_disk_leaves_scene_unchanged() {
        let mut config = furnished();
        config.model_path = Some(PathBuf::from("assets/missing-room.glb"));

        let mut state = RoomState::new(&config).unwrap();
        let nodes_before = state.scene.object_count();

        let event = state
            .events
            .recv_timeout(Duration::from_secs(10))
            .expect("loader never reported back");
        assert!(matches!(event, SceneEvent::ModelFailed { .. }));
        state.apply_event(event);
        state.update();

        assert_eq!(state.scene.object_count(), nodes_before);
    }

    #[test]
    fn successful_load_attaches_one_node_to_room() {
        let mut state = RoomState::build(&furnished());
        let children_before = state.room_children();
        let meshes_before = state.scene.mesh_instances().count();

        state
            .events
            .sender()
            .send(SceneEvent::ModelLoaded {
                path: PathBuf::from("assets/room.glb"),
                asset: lamp_asset(),
            })
            .unwrap();
        state.update();

        assert_eq!(state.room_children(), children_before + 1);
        assert!(state.scene.get_object_by_name("room.glb").is_some());
        assert_eq!(state.scene.mesh_instances().count(), meshes_before + 1);

        // Later frames keep drawing the same scene.
        state.update();
        assert_eq!(state.room_children(), children_before + 1);

        let lamp = state.scene.get_object_by_name("Lamp").unwrap();
        assert_eq!(
            state.scene.get_object(lamp).unwrap().transform.world_position(),
            Vec3::new(0.0, 1.0, 0.0)
        );
    }
}
