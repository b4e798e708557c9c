use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    fov_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Mat4,
}

impl Camera {
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;

    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: config.eye,
            target: config.target,
            up: Vec3::Y,
            fov_degrees: config.fov_degrees,
            aspect: 1.0,
            near: Self::NEAR,
            far: Self::FAR,
            projection: Mat4::IDENTITY,
        };

        camera.set_viewport(width.max(1), height.max(1));
        camera
    }

    /// Tracks the viewport size. A zero-sized viewport (e.g. a minimized window)
    /// keeps the previous aspect ratio.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.aspect = width as f32 / height as f32;
        self.update_projection();
    }

    fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct CameraUniform {
    view_proj: Mat4,
    eye: Vec4,
}

impl CameraUniform {
    pub fn update(&mut self, camera: &Camera) {
        self.view_proj = camera.view_projection();
        self.eye = camera.eye.extend(1.0);
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::room_shell::RoomDimensions;

    fn config() -> CameraConfig {
        CameraConfig {
            eye: Vec3::new(-1.2, 1.1, 0.1),
            target: Vec3::new(2.0, 0.8, -1.5),
            fov_degrees: 60.0,
        }
    }

    #[test]
    fn aspect_tracks_every_resize() {
        let mut camera = Camera::new(&config(), 800, 600);
        assert_eq!(camera.aspect(), 800.0 / 600.0);

        camera.set_viewport(1920, 1080);
        assert_eq!(camera.aspect(), 1920.0 / 1080.0);

        camera.set_viewport(500, 1000);
        assert_eq!(camera.aspect(), 0.5);
    }

    #[test]
    fn projection_is_recomputed_on_resize() {
        let mut camera = Camera::new(&config(), 800, 600);
        let before = camera.projection();

        camera.set_viewport(600, 800);
        assert_ne!(camera.projection(), before);
        assert_eq!(
            camera.projection(),
            Mat4::perspective_rh(60f32.to_radians(), 0.75, Camera::NEAR, Camera::FAR)
        );
    }

    #[test]
    fn zero_sized_viewport_is_ignored() {
        let mut camera = Camera::new(&config(), 1600, 900);
        camera.set_viewport(0, 0);
        assert_eq!(camera.aspect(), 1600.0 / 900.0);
    }

    #[test]
    fn zero_sized_start_still_has_a_projection() {
        let camera = Camera::new(&config(), 0, 0);
        assert_eq!(camera.aspect(), 1.0);
        assert_eq!(
            camera.projection(),
            Mat4::perspective_rh(60f32.to_radians(), 1.0, Camera::NEAR, Camera::FAR)
        );
    }

    #[test]
    fn eye_is_inside_the_room() {
        let camera = Camera::new(&config(), 800, 600);
        let room = RoomDimensions {
            width: 6.0,
            depth: 8.0,
            height: 2.6,
        };

        assert_eq!(camera.fov_degrees(), 60.0);
        assert!(room.bounds().contains_point_strictly(camera.eye));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera::new(&config(), 800, 600);
        let clip = camera.view_projection() * camera.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
