use glam::{Mat4, Vec4};
use id_arena::Arena;
use wgpu::BufferUsages;

use crate::{rendering::render_model::RenderModel, scene_graph::scene::Scene};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub normal: Mat4,
    pub color: Vec4,
}

impl Instance {
    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 9] = wgpu::vertex_attr_array![
            2 => Float32x4,
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4,
            7 => Float32x4,
            8 => Float32x4,
            9 => Float32x4,
            10 => Float32x4,
        ];

        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

pub struct Instances {
    instances: Vec<Instance>,
}

impl Instances {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    pub fn add(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Uploads as many instances as fit and returns how many were written.
    pub fn write_to_buffer(&self, queue: &wgpu::Queue, instance_buffer: &InstanceBuffer) -> u32 {
        let count = self.instances.len().min(InstanceBuffer::MAX_INSTANCES as usize);
        if count < self.instances.len() {
            log::warn!(
                "Dropping {} instances over the limit of {}",
                self.instances.len() - count,
                InstanceBuffer::MAX_INSTANCES
            );
        }

        queue.write_buffer(
            instance_buffer.buffer(),
            0,
            bytemuck::cast_slice(&self.instances[..count]),
        );

        count as u32
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }
}

pub struct InstanceBuffer(wgpu::Buffer);

impl InstanceBuffer {
    const MAX_INSTANCES: u64 = 128;

    pub fn new(device: &wgpu::Device, name: &str) -> Self {
        let label = format!("Instance buffer ({})", name);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&label),
            size: std::mem::size_of::<Instance>() as u64 * Self::MAX_INSTANCES,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self(buffer)
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.0
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer().slice(..));
    }
}

/// Rebuilds every render primitive's instance list from the scene's mesh nodes.
pub fn gather_instances(scene: &Scene, render_models: &mut Arena<RenderModel>) {
    for (_id, render_model) in render_models.iter_mut() {
        for primitive in &mut render_model.primitives {
            primitive.instances.clear();
        }
    }

    for mesh in scene.mesh_instances() {
        let scene_model = &scene.models[mesh.model_id];
        let Some(render_model_id) = scene_model.render_model else {
            continue;
        };
        let Some(render_model) = render_models.get_mut(render_model_id) else {
            continue;
        };

        for (primitive, render_primitive) in scene_model
            .model
            .primitives
            .iter()
            .zip(render_model.primitives.iter_mut())
        {
            render_primitive.instances.add(Instance {
                model: mesh.world_matrix,
                normal: mesh.normal_matrix,
                color: primitive.material.base_color,
            });
        }
    }
}
