use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::Context;
use glam::{Quat, Vec3};

use crate::model::{Buffers, Model};

/// A decoded model file. Plain data, so it can be built off the main thread.
pub struct ModelAsset {
    pub models: Vec<Model>,
    pub roots: Vec<AssetNode>,
}

pub struct AssetNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Index into `ModelAsset::models`.
    pub mesh: Option<usize>,
    pub children: Vec<AssetNode>,
}

pub enum SceneEvent {
    ModelLoaded { path: PathBuf, asset: ModelAsset },
    ModelFailed { path: PathBuf, error: anyhow::Error },
}

/// Queue of scene mutations posted from outside the frame loop.
pub struct SceneEventQueue {
    sender: Sender<SceneEvent>,
    receiver: Receiver<SceneEvent>,
}

impl SceneEventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> Sender<SceneEvent> {
        self.sender.clone()
    }

    /// Returns every event posted since the last drain without blocking.
    pub fn drain(&self) -> impl Iterator<Item = SceneEvent> + '_ {
        self.receiver.try_iter()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<SceneEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

impl ModelAsset {
    pub fn import(path: &Path) -> anyhow::Result<ModelAsset> {
        let (document, buffers, _images) = gltf::import(path)
            .with_context(|| format!("Failed to import glTF file {}", path.display()))?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("No scenes in glTF file")?;

        let mut models = Vec::new();
        let mut gltf_mesh_to_model = HashMap::new();

        let roots = scene
            .nodes()
            .map(|node| Self::read_node(&node, &buffers, &mut models, &mut gltf_mesh_to_model))
            .collect::<anyhow::Result<Vec<AssetNode>>>()?;

        Ok(ModelAsset { models, roots })
    }

    fn read_node(
        node: &gltf::Node,
        buffers: Buffers,
        models: &mut Vec<Model>,
        gltf_mesh_to_model: &mut HashMap<usize, usize>,
    ) -> anyhow::Result<AssetNode> {
        let name = node.name().unwrap_or("Unnamed").to_string();
        let (translation, rotation, scale) = node.transform().decomposed();

        let mesh = match node.mesh() {
            Some(mesh) => {
                let mesh_index = mesh.index();

                let model_index = match gltf_mesh_to_model.get(&mesh_index).copied() {
                    Some(model_index) => model_index,
                    None => {
                        let mesh_name = mesh
                            .name()
                            .map(String::from)
                            .unwrap_or_else(|| format!("{} (Mesh)", name));

                        let model = Model::from_gltf(mesh_name, mesh, buffers)?;
                        models.push(model);
                        let model_index = models.len() - 1;
                        gltf_mesh_to_model.insert(mesh_index, model_index);

                        model_index
                    }
                };

                Some(model_index)
            }
            None => None,
        };

        let children = node
            .children()
            .map(|child| Self::read_node(&child, buffers, models, gltf_mesh_to_model))
            .collect::<anyhow::Result<Vec<AssetNode>>>()?;

        Ok(AssetNode {
            name,
            translation: translation.into(),
            rotation: Quat::from_array(rotation),
            scale: scale.into(),
            mesh,
            children,
        })
    }
}

/// Decodes a model file on a worker thread and posts exactly one
/// `SceneEvent` when done. There is no cancellation or timeout.
pub struct ModelLoader;

impl ModelLoader {
    pub fn spawn(path: impl Into<PathBuf>, sender: Sender<SceneEvent>) -> anyhow::Result<()> {
        let path = path.into();
        log::info!("Loading model {}", path.display());

        thread::Builder::new()
            .name("model-loader".to_string())
            .spawn(move || {
                let event = match ModelAsset::import(&path) {
                    Ok(asset) => SceneEvent::ModelLoaded { path, asset },
                    Err(error) => SceneEvent::ModelFailed { path, error },
                };

                if sender.send(event).is_err() {
                    log::debug!("Scene event queue closed before model load finished");
                }
            })
            .context("Failed to spawn model loader thread")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::transform::Transform;
    use std::time::Duration;

    /// One triangle at (0,0,0), (1,0,0), (0,1,0) followed by u16 indices 0, 1, 2.
    const TRIANGLE_BUFFER: &str = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIA";

    /// A single-node glTF without normals. `mode` is the glTF primitive mode
    /// (0 = points, 4 = triangles).
    fn triangle_gltf(mode: u32) -> String {
        format!(
            r#"{{
                "asset": {{ "version": "2.0" }},
                "scene": 0,
                "scenes": [{{ "nodes": [0] }}],
                "nodes": [{{ "name": "Triangle", "mesh": 0, "scale": [1.0, 3.0, 1.0] }}],
                "meshes": [{{
                    "name": "TriangleMesh",
                    "primitives": [{{
                        "attributes": {{ "POSITION": 0 }},
                        "indices": 1,
                        "material": 0,
                        "mode": {mode}
                    }}]
                }}],
                "materials": [{{
                    "doubleSided": true,
                    "pbrMetallicRoughness": {{ "baseColorFactor": [0.2, 0.4, 0.6, 1.0] }}
                }}],
                "accessors": [
                    {{
                        "bufferView": 0,
                        "componentType": 5126,
                        "count": 3,
                        "type": "VEC3",
                        "min": [0.0, 0.0, 0.0],
                        "max": [1.0, 1.0, 0.0]
                    }},
                    {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}
                ],
                "bufferViews": [
                    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
                    {{ "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }}
                ],
                "buffers": [{{
                    "byteLength": 42,
                    "uri": "data:application/octet-stream;base64,{TRIANGLE_BUFFER}"
                }}]
            }}"#
        )
    }

    fn load(dir: &tempfile::TempDir, file_name: &str, gltf: &str) -> SceneEvent {
        let path = dir.path().join(file_name);
        std::fs::write(&path, gltf).unwrap();

        let queue = SceneEventQueue::new();
        ModelLoader::spawn(&path, queue.sender()).unwrap();
        queue
            .recv_timeout(Duration::from_secs(10))
            .expect("loader never reported back")
    }

    #[test]
    fn triangle_file_decodes_mesh_and_material() {
        let dir = tempfile::tempdir().unwrap();
        let event = load(&dir, "triangle.gltf", &triangle_gltf(4));

        let SceneEvent::ModelLoaded { asset, .. } = event else {
            panic!("triangle.gltf failed to load");
        };

        assert_eq!(asset.models.len(), 1);
        let model = &asset.models[0];
        assert_eq!(model.name, "TriangleMesh");
        assert_eq!(model.primitives.len(), 1);

        let primitive = &model.primitives[0];
        assert_eq!(primitive.vertices.len(), 3);
        assert_eq!(primitive.indices, vec![0, 1, 2]);
        assert_eq!(primitive.vertices[1].position, Vec3::X);
        // No normals in the file, so they come from the winding.
        assert!(primitive
            .vertices
            .iter()
            .all(|vertex| vertex.normal.abs_diff_eq(Vec3::Z, 1e-6)));

        assert!(primitive.material.double_sided);
        assert!(primitive
            .material
            .base_color
            .abs_diff_eq(glam::Vec4::new(0.2, 0.4, 0.6, 1.0), 1e-6));

        assert_eq!(asset.roots.len(), 1);
        assert_eq!(asset.roots[0].name, "Triangle");
        assert_eq!(asset.roots[0].mesh, Some(0));
    }

    #[test]
    fn node_scale_keeps_all_three_axes() {
        let dir = tempfile::tempdir().unwrap();
        let event = load(&dir, "stretched.gltf", &triangle_gltf(4));

        let SceneEvent::ModelLoaded { asset, .. } = event else {
            panic!("stretched.gltf failed to load");
        };

        let node = &asset.roots[0];
        assert_eq!(node.scale, Vec3::new(1.0, 3.0, 1.0));

        let transform = Transform::new(node.translation, node.rotation, node.scale);
        assert!(transform
            .get_local_matrix()
            .transform_point3(Vec3::Y)
            .abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), 1e-6));
    }

    #[test]
    fn point_primitives_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let event = load(&dir, "points.gltf", &triangle_gltf(0));

        match event {
            SceneEvent::ModelFailed { error, .. } => {
                assert!(format!("{error:#}").contains("Unsupported primitive mode"));
            }
            SceneEvent::ModelLoaded { .. } => panic!("point cloud was accepted"),
        }
    }

    #[test]
    fn missing_file_reports_failure() {
        let queue = SceneEventQueue::new();
        ModelLoader::spawn("assets/does-not-exist.glb", queue.sender()).unwrap();

        match queue.recv_timeout(Duration::from_secs(10)) {
            Some(SceneEvent::ModelFailed { path, error }) => {
                assert_eq!(path, PathBuf::from("assets/does-not-exist.glb"));
                assert!(format!("{error:#}").contains("does-not-exist.glb"));
            }
            Some(SceneEvent::ModelLoaded { .. }) => panic!("missing file loaded"),
            None => panic!("loader never reported back"),
        }

        // Exactly one event per load.
        assert!(queue.drain().next().is_none());
    }

    #[test]
    fn drain_is_non_blocking() {
        let queue = SceneEventQueue::new();
        assert_eq!(queue.drain().count(), 0);
    }
}
