use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use gltf::buffer;
use itertools::izip;

use crate::color::Color;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA.
    pub base_color: Vec4,
    pub double_sided: bool,
}

impl Material {
    pub fn solid(color: Color) -> Self {
        Self {
            base_color: color.to_vec4(),
            double_sided: false,
        }
    }

    pub fn double_sided(color: Color) -> Self {
        Self {
            base_color: color.to_vec4(),
            double_sided: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            double_sided: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    pub fn from_mesh(name: impl Into<String>, mesh: MeshData, material: Material) -> Model {
        Model {
            name: name.into(),
            primitives: vec![ModelPrimitive {
                index: 0,
                vertices: mesh.vertices,
                indices: mesh.indices,
                material,
            }],
        }
    }

    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Model> {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                return Err(anyhow::anyhow!(
                    "Unsupported primitive mode in {}: {:?}",
                    model.name,
                    primitive.mode()
                ));
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions = reader
                .read_positions()
                .ok_or_else(|| anyhow::anyhow!("Primitive without positions in {}", model.name))?
                .map(Vec3::from)
                .collect::<Vec<Vec3>>();

            let indices = match reader.read_indices() {
                Some(index_reader) => index_reader.into_u32().collect::<Vec<u32>>(),
                None => (0..positions.len() as u32).collect(),
            };

            let normals = match reader.read_normals() {
                Some(normal_reader) => normal_reader.map(Vec3::from).collect::<Vec<Vec3>>(),
                None => {
                    log::debug!(
                        "Computing normals for {} primitive {}",
                        model.name,
                        primitive.index()
                    );
                    compute_normals(&positions, &indices)
                }
            };

            let vertices = izip!(positions, normals)
                .map(|(position, normal)| Vertex::new(position, normal))
                .collect::<Vec<Vertex>>();

            let gltf_material = primitive.material();
            let material = Material {
                base_color: Vec4::from(gltf_material.pbr_metallic_roughness().base_color_factor()),
                double_sided: gltf_material.double_sided(),
            };

            model.primitives.push(ModelPrimitive {
                index: primitive.index(),
                vertices,
                indices,
                material,
            });
        }

        if model.primitives.is_empty() {
            return Err(anyhow::anyhow!("Mesh without primitives: {}", model.name));
        }

        Ok(model)
    }
}

/// Area-weighted vertex normals for meshes that don't ship their own.
fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }

        let face_normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }

    normals
        .into_iter()
        .map(|normal| normal.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
