use glam::Vec3;
use shoal_params::{ObstacleConfig, TankConfig};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build from two opposite corners given in any order
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Nearest point of the box to `point`; `point` itself when inside
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        point.distance(self.closest_point(point))
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }
}

impl From<&ObstacleConfig> for Aabb {
    fn from(config: &ObstacleConfig) -> Self {
        let [a, b] = config.corners;
        Self::from_corners(Vec3::from_array(a), Vec3::from_array(b))
    }
}

impl From<&TankConfig> for Aabb {
    fn from(config: &TankConfig) -> Self {
        Self::from_corners(Vec3::from_array(config.min), Vec3::from_array(config.max))
    }
}
