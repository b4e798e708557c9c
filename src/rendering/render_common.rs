use std::sync::RwLock;

use wgpu::SurfaceConfiguration;
use winit::dpi::PhysicalSize;

use crate::{camera::CameraUniform, config::RenderConfig, lights::LightUniform};

pub struct RenderCommon {
    pub output_surface_config: RwLock<SurfaceConfiguration>,
    pub camera_uniform_buffer: wgpu::Buffer,
    pub light_uniform_buffer: wgpu::Buffer,
    pub config: RenderConfig,
    pub sample_count: u32,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
        config: &RenderConfig,
    ) -> anyhow::Result<Self> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface is not supported by the adapter"))?;

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        let camera_uniform_buffer = CameraUniform::default().create_buffer(device);
        let light_uniform_buffer = LightUniform::default().create_buffer(device);

        Ok(Self {
            output_surface_config: RwLock::new(output_surface_config),
            camera_uniform_buffer,
            light_uniform_buffer,
            config: config.clone(),
            sample_count: if config.antialias { 4 } else { 1 },
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.output_surface_config
            .read()
            .map(|config| config.format)
            .unwrap_or_else(|poisoned| poisoned.into_inner().format)
    }
}
