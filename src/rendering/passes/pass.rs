use std::sync::Arc;

use wgpu::RenderPass;

use crate::rendering::render_common::RenderCommon;

pub(crate) trait Pass {
    type TextureViews;

    fn create(device: &wgpu::Device, common: Arc<RenderCommon>) -> anyhow::Result<Self>
    where
        Self: Sized;

    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        encoder: &mut wgpu::CommandEncoder,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a;
}
