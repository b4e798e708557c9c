use std::f32::consts::FRAC_1_PI;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    color::Color,
    scene_graph::{
        object3d::{Object3D, ObjectId, ObjectKind},
        scene::Scene,
        transform::Transform,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    /// A distant source shining from the node's position toward `target`.
    Directional {
        color: Color,
        intensity: f32,
        target: Vec3,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightConfig {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    pub directional_color: Color,
    pub directional_intensity: f32,
    pub directional_position: Vec3,
    pub directional_target: Vec3,
    pub cast_shadow: bool,
}

pub struct LightRig {
    pub ambient: Light,
    pub directional: Light,
    directional_position: Vec3,
    cast_shadow: bool,
}

impl LightRig {
    pub fn from_config(config: &LightConfig) -> Self {
        Self {
            ambient: Light::Ambient {
                color: config.ambient_color,
                intensity: config.ambient_intensity,
            },
            directional: Light::Directional {
                color: config.directional_color,
                intensity: config.directional_intensity,
                target: config.directional_target,
            },
            directional_position: config.directional_position,
            cast_shadow: config.cast_shadow,
        }
    }

    /// Adds both lights as root-level nodes and returns (ambient, directional).
    pub fn spawn(&self, scene: &mut Scene) -> (ObjectId, ObjectId) {
        let ambient = scene.add_object(Object3D {
            name: "Ambient light".to_string(),
            kind: ObjectKind::Light(self.ambient),
            ..Default::default()
        });

        let directional = scene.add_object(Object3D {
            name: "Directional light".to_string(),
            transform: Transform::from_translation(self.directional_position),
            kind: ObjectKind::Light(self.directional),
            cast_shadow: self.cast_shadow,
            ..Default::default()
        });

        (ambient, directional)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Default)]
/// Light terms for Lambert shading. The color terms are irradiance already
/// multiplied by the Lambert BRDF factor 1/π, so the shader only multiplies
/// them by the surface albedo.
pub struct LightUniform {
    /// rgb = summed ambient term, w unused
    pub ambient: Vec4,
    /// rgb = directional term at normal incidence, w unused
    pub directional_color: Vec4,
    /// xyz = unit vector pointing toward the light
    pub direction: Vec4,
}

impl LightUniform {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut uniform = LightUniform::default();
        let mut has_directional = false;

        for (light, position) in scene.lights() {
            match light {
                Light::Ambient { color, intensity } => {
                    uniform.ambient += (color.scaled(intensity) * FRAC_1_PI).extend(0.0);
                }
                Light::Directional {
                    color,
                    intensity,
                    target,
                } => {
                    if has_directional {
                        log::trace!("Ignoring extra directional light");
                        continue;
                    }

                    has_directional = true;
                    uniform.directional_color = (color.scaled(intensity) * FRAC_1_PI).extend(0.0);
                    uniform.direction = (position - target)
                        .try_normalize()
                        .unwrap_or(Vec3::Y)
                        .extend(0.0);
                }
            }
        }

        uniform
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Uniform Buffer"),
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
    use crate::config::{SceneConfig, ScenePreset};

    fn config() -> LightConfig {
        LightConfig {
            ambient_color: Color::WHITE,
            ambient_intensity: 1.2,
            directional_color: Color::WHITE,
            directional_intensity: 1.0,
            directional_position: Vec3::new(5.0, 10.0, 5.0),
            directional_target: Vec3::ZERO,
            cast_shadow: true,
        }
    }

    #[test]
    fn rig_spawns_two_root_lights() {
        let mut scene = Scene::new();
        let (ambient, directional) = LightRig::from_config(&config()).spawn(&mut scene);

        assert_eq!(scene.object_count(), 2);
        assert!(scene.get_object(ambient).unwrap().parent_id.is_none());

        let sun = scene.get_object(directional).unwrap();
        assert!(sun.cast_shadow);
        assert_eq!(sun.transform.translation(), Vec3::new(5.0, 10.0, 5.0));
    }

    #[test]
    fn uniform_points_toward_the_light() {
        let mut scene = Scene::new();
        LightRig::from_config(&config()).spawn(&mut scene);
        scene.update_transforms();

        let uniform = LightUniform::from_scene(&scene);

        assert!(uniform
            .ambient
            .truncate()
            .abs_diff_eq(Vec3::splat(1.2 * FRAC_1_PI), 1e-6));
        assert!(uniform
            .directional_color
            .truncate()
            .abs_diff_eq(Vec3::splat(FRAC_1_PI), 1e-6));
        let expected = Vec3::new(5.0, 10.0, 5.0).normalize();
        assert!(uniform.direction.truncate().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn ambient_lights_accumulate() {
        let mut scene = Scene::new();
        for _ in 0..2 {
            scene.add_object(Object3D {
                kind: ObjectKind::Light(Light::Ambient {
                    color: Color::WHITE,
                    intensity: 0.5,
                }),
                ..Default::default()
            });
        }
        scene.update_transforms();

        let uniform = LightUniform::from_scene(&scene);
        assert!(uniform
            .ambient
            .truncate()
            .abs_diff_eq(Vec3::splat(FRAC_1_PI), 1e-6));
        assert_eq!(uniform.directional_color, Vec4::ZERO);
    }

    /// Same as `fs_main` in scene.wgsl, including the clamp the 8-bit target applies.
    fn shade(uniform: &LightUniform, albedo: Vec3, n_dot_l: f32) -> Vec3 {
        let radiance = uniform.ambient.truncate()
            + uniform.directional_color.truncate() * n_dot_l.max(0.0);
        (albedo * radiance).min(Vec3::ONE)
    }

    #[test]
    fn sunlight_brightens_every_shell_color() {
        let scene_config = SceneConfig::preset(ScenePreset::Furnished);
        let mut scene = Scene::new();
        LightRig::from_config(&scene_config.lights).spawn(&mut scene);
        scene.update_transforms();
        let uniform = LightUniform::from_scene(&scene);

        let colors = scene_config.room_colors;
        for (name, color) in [
            ("floor", colors.floor),
            ("walls", colors.walls),
            ("ceiling", colors.ceiling),
        ] {
            let unlit = shade(&uniform, color.0, 0.0);
            let lit = shade(&uniform, color.0, 1.0);

            assert!(unlit.max_element() < 1.0, "{name} saturates under ambient alone");
            assert!(
                lit.cmpgt(unlit).all(),
                "{name}: lit {lit} is not brighter than unlit {unlit}"
            );
        }
    }
}
