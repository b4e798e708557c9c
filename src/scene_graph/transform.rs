use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    inverse_transpose_world_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            inverse_transpose_world_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY, Vec3::ONE)
    }

    pub fn get_local_matrix(&self) -> Ref<Mat4> {
        if self.local_dirty.get() {
            let matrix = Mat4::from_scale_rotation_translation(
                self.scale,
                self.rotation,
                self.translation,
            );

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
            self.invalidate_world();
        }

        self.local_matrix.borrow()
    }

    pub fn get_world_matrix(&self) -> Ref<Mat4> {
        self.world_matrix.borrow()
    }

    pub fn get_inverse_transpose_world_matrix(&self) -> Ref<Mat4> {
        self.inverse_transpose_world_matrix.borrow()
    }

    pub fn set_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
        self.inverse_transpose_world_matrix
            .replace(world_matrix.inverse().transpose());
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    #[allow(dead_code)]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// World-space origin of this transform, valid after the scene's last
    /// transform update.
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.borrow().w_axis.truncate()
    }
}
