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

#[derive(Debug, Clone, PartialEq)]
pub struct FurnitureConfig {
    pub name: &'static str,
    pub size: Vec3,
    pub position: Vec3,
    pub color: Color,
    pub cast_shadow: bool,
}

impl FurnitureConfig {
    pub fn bounds(&self) -> AABB {
        AABB::from_center_size(self.position, self.size)
    }
}

pub fn spawn_furniture(
    scene: &mut Scene,
    parent: ObjectId,
    furniture: &[FurnitureConfig],
) -> Vec<ObjectId> {
    furniture
        .iter()
        .map(|piece| {
            let model = Model::from_mesh(
                piece.name,
                primitives::cuboid(piece.size),
                Material::solid(piece.color),
            );
            let model_id = scene.add_model(model);

            scene.add_child(
                parent,
                Object3D {
                    name: piece.name.to_string(),
                    transform: Transform::new(piece.position, Quat::IDENTITY, Vec3::ONE),
                    kind: ObjectKind::Mesh(model_id),
                    cast_shadow: piece.cast_shadow,
                    ..Default::default()
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_piece_gets_its_own_mesh() {
        let mut scene = Scene::new();
        let room = scene.add_object(Object3D::group("Room"));

        let pieces = [
            FurnitureConfig {
                name: "Desk",
                size: Vec3::new(2.0, 0.1, 1.0),
                position: Vec3::new(-2.0, 0.5, -2.0),
                color: Color::from_hex(0x8b4513),
                cast_shadow: true,
            },
            FurnitureConfig {
                name: "Chair",
                size: Vec3::new(0.6, 0.8, 0.6),
                position: Vec3::new(-1.5, 0.4, -1.5),
                color: Color::from_hex(0xff0000),
                cast_shadow: false,
            },
        ];

        let ids = spawn_furniture(&mut scene, room, &pieces);
        assert_eq!(ids.len(), 2);
        assert_eq!(scene.models.len(), 2);

        let desk = scene.get_object(ids[0]).unwrap();
        assert_eq!(desk.name, "Desk");
        assert!(desk.cast_shadow);
        assert_eq!(desk.transform.translation(), Vec3::new(-2.0, 0.5, -2.0));

        let chair = scene.get_object(ids[1]).unwrap();
        assert!(!chair.cast_shadow);
        let ObjectKind::Mesh(model_id) = chair.kind else {
            panic!("chair is not a mesh");
        };
        let material = scene.models[model_id].model.primitives[0].material;
        assert_eq!(material.base_color, Color::from_hex(0xff0000).to_vec4());
        assert!(!material.double_sided);
    }
}
