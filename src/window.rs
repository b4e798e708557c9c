use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{config::AppConfig, rendering::renderer::Renderer, room::RoomState};

struct App {
    config: AppConfig,
    renderer: Option<Renderer>,
    state: RoomState,
    frame: u64,
}

impl App {
    fn new(config: AppConfig, state: RoomState) -> Self {
        Self {
            config,
            renderer: None,
            state,
            frame: 0,
        }
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes().with_title(self.config.scene.title);
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        let renderer = pollster::block_on(Renderer::new(Arc::new(window), &self.config.render))?;

        let size = renderer.window.inner_size();
        self.state.camera.set_viewport(size.width, size.height);
        self.renderer = Some(renderer);

        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        // Schedule the next frame before drawing this one.
        renderer.window.request_redraw();

        self.state.update();
        renderer.sync_models(&mut self.state.scene);

        self.frame += 1;
        log::trace!("Frame {}", self.frame);

        match renderer.render(&self.state) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(error) = self.create_renderer(event_loop) {
            log::error!("Failed to initialise renderer: {:#}", error);
            event_loop.exit();
            return;
        }

        if let Some(renderer) = &self.renderer {
            renderer.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.state.camera.set_viewport(new_size.width, new_size.height);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }
    }
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let state = RoomState::new(&config.scene).context("Failed to create room state")?;
    let mut app = App::new(config, state);
    event_loop.run_app(&mut app)?;

    Ok(())
}
