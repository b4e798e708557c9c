use std::sync::Arc;

use wgpu::{
    DepthBiasState, MultisampleState, PipelineCompilationOptions, RenderPass,
    RenderPassDescriptor, ShaderSource, StencilState,
};

use crate::rendering::{
    instance::Instance,
    passes::pass::Pass,
    render_common::RenderCommon,
    render_model::RENDER_MODEL_VBL,
    texture::DepthTexture,
};

const SCENE_SHADER: &str = include_str!("../../shaders/scene.wgsl");

/// Draws the scene's meshes with ambient + directional Lambert shading.
pub struct ScenePass {
    single_sided: wgpu::RenderPipeline,
    double_sided: wgpu::RenderPipeline,
    frame_bind_group: wgpu::BindGroup,
    clear_color: wgpu::Color,
}

pub struct SceneTextureViews {
    pub color: wgpu::TextureView,
    pub resolve_target: Option<wgpu::TextureView>,
    pub depth: wgpu::TextureView,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ScenePass {
    pub fn pipeline(&self, double_sided: bool) -> &wgpu::RenderPipeline {
        if double_sided {
            &self.double_sided
        } else {
            &self.single_sided
        }
    }
}

impl Pass for ScenePass {
    type TextureViews = SceneTextureViews;

    fn create(device: &wgpu::Device, common: Arc<RenderCommon>) -> anyhow::Result<Self> {
        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Frame bind group layout"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                    uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                ],
            });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame bind group"),
            layout: &frame_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: common.camera_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: common.light_uniform_buffer.as_entire_binding(),
                },
            ],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[&frame_bind_group_layout],
                push_constant_ranges: &[],
            });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: ShaderSource::Wgsl(SCENE_SHADER.into()),
        });

        let format = common.surface_format();

        let create_pipeline = |label: &str, cull_mode: Option<wgpu::Face>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[RENDER_MODEL_VBL, Instance::descriptor()],
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: MultisampleState {
                    count: common.sample_count,
                    ..Default::default()
                },
                multiview: None,
                cache: None,
            })
        };

        Ok(ScenePass {
            single_sided: create_pipeline("Scene pipeline (single-sided)", Some(wgpu::Face::Back)),
            double_sided: create_pipeline("Scene pipeline (double-sided)", None),
            frame_bind_group,
            clear_color: common.config.background.to_wgpu(),
        })
    }

    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        encoder: &mut wgpu::CommandEncoder,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a,
    {
        let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &texture_views.color,
                resolve_target: texture_views.resolve_target.as_ref(),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        render_callback(&mut render_pass);
    }
}
