use winit::dpi::PhysicalSize;

pub struct Texture {
    _texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
}

impl Texture {
    pub fn from_wgpu_texture(texture: wgpu::Texture, device: &wgpu::Device) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            _texture: texture,
            view,
            sampler,
        }
    }
}

fn create_attachment(
    device: &wgpu::Device,
    size: PhysicalSize<u32>,
    format: wgpu::TextureFormat,
    sample_count: u32,
    usage: wgpu::TextureUsages,
    label: &str,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    })
}

pub struct DepthTexture {
    texture: Texture,
    label: String,
}

impl DepthTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        sample_count: u32,
        label: impl Into<String>,
    ) -> Self {
        let label: String = label.into();
        let texture = create_attachment(
            device,
            size,
            Self::DEPTH_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            &label,
        );

        DepthTexture {
            texture: Texture::from_wgpu_texture(texture, device),
            label,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>, sample_count: u32) {
        let texture = create_attachment(
            device,
            size,
            Self::DEPTH_FORMAT,
            sample_count,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            &self.label,
        );
        self.texture = Texture::from_wgpu_texture(texture, device);
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.texture.view
    }
}

/// Offscreen color target the scene is drawn into. With multisampling the
/// scene renders into `multisampled` and resolves into `resolved`, which is
/// what the present pass samples.
pub struct ColorTarget {
    resolved: Texture,
    multisampled: Option<wgpu::TextureView>,
}

impl ColorTarget {
    pub fn new(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let resolved = create_attachment(
            device,
            size,
            format,
            1,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            "Scene color target",
        );

        let multisampled = (sample_count > 1).then(|| {
            create_attachment(
                device,
                size,
                format,
                sample_count,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
                "Scene multisampled color target",
            )
            .create_view(&wgpu::TextureViewDescriptor::default())
        });

        Self {
            resolved: Texture::from_wgpu_texture(resolved, device),
            multisampled,
        }
    }

    /// The view to render into.
    pub fn attachment(&self) -> &wgpu::TextureView {
        self.multisampled.as_ref().unwrap_or(&self.resolved.view)
    }

    /// Where multisampled output is resolved to, if multisampling is on.
    pub fn resolve_target(&self) -> Option<&wgpu::TextureView> {
        self.multisampled.as_ref().map(|_| &self.resolved.view)
    }

    pub fn resolved(&self) -> &Texture {
        &self.resolved
    }
}
