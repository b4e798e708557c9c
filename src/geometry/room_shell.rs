use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};

use crate::{
    color::Color,
    geometry::primitives,
    math::bounds::AABB,
    model::{Material, Model},
    scene_graph::{
        object3d::{Object3D, ObjectId, ObjectKind},
        scene::Scene,
        transform::Transform,
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomDimensions {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl RoomDimensions {
    /// The enclosed volume. The floor sits at y = 0 and the room is centered on
    /// the origin in x and z.
    pub fn bounds(&self) -> AABB {
        AABB::new(
            Vec3::new(-self.width * 0.5, 0.0, -self.depth * 0.5),
            Vec3::new(self.width * 0.5, self.height, self.depth * 0.5),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Floor,
    Ceiling,
    BackWall,
    FrontWall,
    LeftWall,
    RightWall,
}

impl SurfaceKind {
    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Floor => "Floor",
            SurfaceKind::Ceiling => "Ceiling",
            SurfaceKind::BackWall => "Back wall",
            SurfaceKind::FrontWall => "Front wall",
            SurfaceKind::LeftWall => "Left wall",
            SurfaceKind::RightWall => "Right wall",
        }
    }
}

/// One side of the room: a plane that faces +Z before `rotation` is applied.
#[derive(Debug, Clone, Copy)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub width: f32,
    pub height: f32,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Surface {
    pub fn normal(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// World-space corners in winding order.
    #[allow(dead_code)]
    pub fn corners(&self) -> [Vec3; 4] {
        let half_width = self.width * 0.5;
        let half_height = self.height * 0.5;

        [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(|(u, v)| {
            self.position + self.rotation * Vec3::new(u * half_width, v * half_height, 0.0)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomColors {
    pub floor: Color,
    pub walls: Color,
    pub ceiling: Color,
}

pub struct RoomShell {
    pub surfaces: [Surface; 6],
}

impl RoomShell {
    pub fn new(dimensions: RoomDimensions) -> Self {
        let RoomDimensions {
            width,
            depth,
            height,
        } = dimensions;

        let surface = |kind, width, height, position, rotation| Surface {
            kind,
            width,
            height,
            position,
            rotation,
        };

        Self {
            surfaces: [
                surface(
                    SurfaceKind::Floor,
                    width,
                    depth,
                    Vec3::ZERO,
                    Quat::from_rotation_x(-FRAC_PI_2),
                ),
                surface(
                    SurfaceKind::Ceiling,
                    width,
                    depth,
                    Vec3::new(0.0, height, 0.0),
                    Quat::from_rotation_x(FRAC_PI_2),
                ),
                surface(
                    SurfaceKind::BackWall,
                    width,
                    height,
                    Vec3::new(0.0, height * 0.5, -depth * 0.5),
                    Quat::IDENTITY,
                ),
                surface(
                    SurfaceKind::FrontWall,
                    width,
                    height,
                    Vec3::new(0.0, height * 0.5, depth * 0.5),
                    Quat::from_rotation_y(PI),
                ),
                surface(
                    SurfaceKind::LeftWall,
                    depth,
                    height,
                    Vec3::new(-width * 0.5, height * 0.5, 0.0),
                    Quat::from_rotation_y(FRAC_PI_2),
                ),
                surface(
                    SurfaceKind::RightWall,
                    depth,
                    height,
                    Vec3::new(width * 0.5, height * 0.5, 0.0),
                    Quat::from_rotation_y(-FRAC_PI_2),
                ),
            ],
        }
    }

    /// Adds one double-sided plane per surface under `parent`.
    pub fn spawn(&self, scene: &mut Scene, parent: ObjectId, colors: &RoomColors) -> Vec<ObjectId> {
        self.surfaces
            .iter()
            .map(|surface| {
                let color = match surface.kind {
                    SurfaceKind::Floor => colors.floor,
                    SurfaceKind::Ceiling => colors.ceiling,
                    _ => colors.walls,
                };

                let model = Model::from_mesh(
                    surface.kind.name(),
                    primitives::plane(surface.width, surface.height),
                    Material::double_sided(color),
                );
                let model_id = scene.add_model(model);
                log::debug!("{} faces {}", surface.kind.name(), surface.normal());

                scene.add_child(
                    parent,
                    Object3D {
                        name: surface.kind.name().to_string(),
                        transform: Transform::new(surface.position, surface.rotation, Vec3::ONE),
                        kind: ObjectKind::Mesh(model_id),
                        ..Default::default()
                    },
                )
            })
            .collect()
    }
}
