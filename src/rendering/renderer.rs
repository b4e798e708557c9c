use std::sync::Arc;

use anyhow::Context;
use id_arena::Arena;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    config::RenderConfig,
    lights::LightUniform,
    rendering::{
        instance::gather_instances,
        passes::{
            pass::Pass,
            present_pass::{PresentPass, PresentTextureViews},
            scene_pass::{ScenePass, SceneTextureViews},
        },
        render_common::RenderCommon,
        render_model::{render_model_instances, RenderModel},
        texture::{ColorTarget, DepthTexture},
    },
    room::RoomState,
    scene_graph::scene::Scene,
};

/// Internal resolution for a window of `physical` pixels, with the device
/// pixel ratio capped at `max_pixel_ratio`.
pub fn render_resolution(
    physical: PhysicalSize<u32>,
    scale_factor: f64,
    max_pixel_ratio: f64,
) -> PhysicalSize<u32> {
    if scale_factor <= max_pixel_ratio {
        return physical;
    }

    let ratio = max_pixel_ratio / scale_factor;
    PhysicalSize::new(
        ((physical.width as f64 * ratio).round() as u32).max(1),
        ((physical.height as f64 * ratio).round() as u32).max(1),
    )
}

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,
    render_size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    color_target: ColorTarget,
    depth_texture: DepthTexture,
    render_models: Arena<RenderModel>,

    camera_uniform: CameraUniform,

    scene_pass: ScenePass,
    present_pass: PresentPass,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, config: &RenderConfig) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let common = Arc::new(RenderCommon::new(&device, &adapter, &surface, size, config)?);

        let render_size = render_resolution(size, window.scale_factor(), config.max_pixel_ratio);
        let format = common.surface_format();
        let color_target = ColorTarget::new(&device, render_size, format, common.sample_count);
        let depth_texture =
            DepthTexture::new(&device, render_size, common.sample_count, "Depth Texture");

        let scene_pass = ScenePass::create(&device, common.clone())?;
        let mut present_pass = PresentPass::create(&device, common.clone())?;
        present_pass.set_source(&device, color_target.resolved());

        log::info!(
            "Renderer ready: {}x{} surface, {}x{} scene, {}x MSAA",
            size.width,
            size.height,
            render_size.width,
            render_size.height,
            common.sample_count
        );

        Ok(Self {
            window,
            size,
            render_size,
            surface,
            device,
            queue,
            common,
            color_target,
            depth_texture,
            render_models: Arena::new(),
            camera_uniform: CameraUniform::default(),
            scene_pass,
            present_pass,
        })
    }

    /// Uploads GPU buffers for scene models that don't have them yet.
    pub fn sync_models(&mut self, scene: &mut Scene) {
        for (_id, scene_model) in scene.models.iter_mut() {
            if scene_model.render_model.is_some() {
                continue;
            }

            let render_model = RenderModel::from_model(&self.device, &scene_model.model);
            scene_model.render_model = Some(self.render_models.alloc(render_model));
            log::debug!(
                "Uploaded model {} with {} primitives",
                scene_model.model.name,
                scene_model.model.primitives.len()
            );
        }
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        self.size = new_size;
        {
            let mut config = self
                .common
                .output_surface_config
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            config.width = new_size.width;
            config.height = new_size.height;
            self.surface.configure(&self.device, &config);
        }

        self.render_size = render_resolution(
            new_size,
            self.window.scale_factor(),
            self.common.config.max_pixel_ratio,
        );
        self.color_target = ColorTarget::new(
            &self.device,
            self.render_size,
            self.common.surface_format(),
            self.common.sample_count,
        );
        self.depth_texture
            .resize(&self.device, self.render_size, self.common.sample_count);
        self.present_pass
            .set_source(&self.device, self.color_target.resolved());

        log::debug!(
            "Resized to {}x{} (scene {}x{})",
            new_size.width,
            new_size.height,
            self.render_size.width,
            self.render_size.height
        );
    }

    pub fn render(&mut self, state: &RoomState) -> Result<(), wgpu::SurfaceError> {
        self.camera_uniform.update(&state.camera);
        self.camera_uniform
            .update_buffer(&self.queue, &self.common.camera_uniform_buffer);
        LightUniform::from_scene(&state.scene)
            .update_buffer(&self.queue, &self.common.light_uniform_buffer);

        gather_instances(&state.scene, &mut self.render_models);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.scene_pass.render(
            &SceneTextureViews {
                color: self.color_target.attachment().clone(),
                resolve_target: self.color_target.resolve_target().cloned(),
                depth: self.depth_texture.view().clone(),
            },
            &mut encoder,
            |render_pass| {
                for double_sided in [false, true] {
                    render_pass.set_pipeline(self.scene_pass.pipeline(double_sided));

                    for (_id, render_model) in self.render_models.iter() {
                        render_model_instances(
                            render_pass,
                            &self.queue,
                            render_model,
                            double_sided,
                        );
                    }
                }
            },
        );

        self.present_pass.render(
            &PresentTextureViews { color: view },
            &mut encoder,
            |render_pass| render_pass.draw(0..3, 0..1),
        );

        self.queue.submit([encoder.finish()]);

        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_is_unchanged_below_the_cap() {
        let physical = PhysicalSize::new(2560, 1440);
        assert_eq!(render_resolution(physical, 1.0, 2.0), physical);
        assert_eq!(render_resolution(physical, 2.0, 2.0), physical);
    }

    #[test]
    fn resolution_is_capped_on_dense_displays() {
        // 1280x720 logical at 3x
        let physical = PhysicalSize::new(3840, 2160);
        assert_eq!(
            render_resolution(physical, 3.0, 2.0),
            PhysicalSize::new(2560, 1440)
        );
    }

    #[test]
    fn capped_resolution_never_reaches_zero() {
        let physical = PhysicalSize::new(1, 1);
        assert_eq!(render_resolution(physical, 4.0, 2.0), PhysicalSize::new(1, 1));
    }
}
