use glam::Vec3;

use super::aabb::Aabb;
use super::fish::Fish;

/// School statistics for metrics collection
#[derive(Debug, Clone, Default)]
pub struct FlockStats {
    pub fish_count: u32,
    pub mean_speed: f32,
    pub polarization: f32,          // |mean heading|, 1 when all fish swim in parallel
    pub centroid: Vec3,
    pub mean_nearest_neighbor: f32,
    pub outside_tank: u32,
}

impl FlockStats {
    pub fn compute(school: &[Fish], tank: &Aabb) -> Self {
        if school.is_empty() {
            return Self::default();
        }

        let n = school.len() as f32;
        let mean_speed = school.iter().map(|f| f.speed).sum::<f32>() / n;
        let polarization = (school.iter().map(|f| f.velocity).sum::<Vec3>() / n).length();
        let centroid = school.iter().map(|f| f.position).sum::<Vec3>() / n;
        let outside_tank = school.iter().filter(|f| !tank.contains(f.position)).count() as u32;

        // Brute force, same cost as the neighbor field itself
        let mean_nearest_neighbor = if school.len() > 1 {
            let total: f32 = school
                .iter()
                .enumerate()
                .map(|(i, fish)| {
                    school
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, other)| fish.position.distance(other.position))
                        .fold(f32::INFINITY, f32::min)
                })
                .sum();
            total / n
        } else {
            0.0
        };

        Self {
            fish_count: school.len() as u32,
            mean_speed,
            polarization,
            centroid,
            mean_nearest_neighbor,
            outside_tank,
        }
    }
}
