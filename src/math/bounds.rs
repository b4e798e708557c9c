use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(point1: Vec3, point2: Vec3) -> AABB {
        let min = point1.min(point2);
        let max = point1.max(point2);
        AABB { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> AABB {
        let half = size * 0.5;
        AABB::new(center - half, center + half)
    }

    #[allow(dead_code)]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Like `contains_point`, but points on the boundary are outside.
    pub fn contains_point_strictly(&self, point: Vec3) -> bool {
        point.x > self.min.x
            && point.x < self.max.x
            && point.y > self.min.y
            && point.y < self.max.y
            && point.z > self.min.z
            && point.z < self.max.z
    }

    pub fn contains_aabb(&self, other: &AABB) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_corners() {
        let aabb = AABB::new(Vec3::new(1.0, -1.0, 2.0), Vec3::new(-1.0, 1.0, 0.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn boundary_points_are_not_strictly_inside() {
        let aabb = AABB::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point_strictly(Vec3::ONE));
        assert!(aabb.contains_point_strictly(Vec3::splat(0.5)));
    }

    #[test]
    fn contains_aabb_rejects_overhang() {
        let room = AABB::new(Vec3::new(-3.0, 0.0, -4.0), Vec3::new(3.0, 2.6, 4.0));
        let inside = AABB::from_center_size(Vec3::new(2.0, 0.3, 0.0), Vec3::new(1.5, 0.3, 2.5));
        let overhang = AABB::from_center_size(Vec3::new(3.0, 0.3, 1.5), Vec3::splat(0.5));

        assert!(room.contains_aabb(&inside));
        assert!(!room.contains_aabb(&overhang));
    }
}
