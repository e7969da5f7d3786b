//! Steering force fields
//!
//! Each field is a pure function of a read-only snapshot of the school, so the
//! result for one fish never depends on the order the school is updated in.

use glam::Vec3;
use shoal_params::{Axis, SteeringConfig};

use super::aabb::Aabb;
use super::fish::WORLD_UP;

/// Below this distance a fish counts as touching or inside an obstacle
pub const CONTACT_EPSILON: f32 = 1e-4;

/// The four unweighted contributions acting on one fish
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SteeringForces {
    pub flow: Vec3,
    pub neighbor: Vec3,
    pub wall: Vec3,
    pub obstacle: Vec3,
}

impl SteeringForces {
    /// Sample every field for fish `index` against the position snapshot
    pub fn sample(
        index: usize,
        positions: &[Vec3],
        time: f32,
        tank: &Aabb,
        obstacles: &[Aabb],
        config: &SteeringConfig,
    ) -> Self {
        let position = positions[index];
        Self {
            flow: flow_force(position, time),
            neighbor: neighbor_avoidance(index, positions, config.avoid_radius),
            wall: wall_avoidance(position, tank, config.wall_margin, config.mirrored_floor_axis),
            obstacle: obstacle_avoidance(position, obstacles, config.obstacle_avoid_distance),
        }
    }

    /// Weighted sum; not normalized
    pub fn combine(&self, config: &SteeringConfig) -> Vec3 {
        self.flow * config.flow_weight
            + self.neighbor * config.neighbor_weight
            + self.wall * config.wall_weight
            + self.obstacle * config.obstacle_weight
    }
}

/// Time-varying pseudo-turbulent drift, unit length where defined
pub fn flow_force(position: Vec3, time: f32) -> Vec3 {
    Vec3::new(
        (position.z + time).sin(),
        (position.x + time * 0.5).cos(),
        (position.y + time).cos(),
    )
    .normalize_or_zero()
}

/// Linear repulsion from every other fish closer than `avoid_radius`
pub fn neighbor_avoidance(index: usize, positions: &[Vec3], avoid_radius: f32) -> Vec3 {
    let me = positions[index];
    let mut push = Vec3::ZERO;

    for (j, &other) in positions.iter().enumerate() {
        if j == index {
            continue;
        }
        let offset = me - other;
        let distance = offset.length();
        if distance < avoid_radius {
            // Coincident fish have no defined direction and contribute nothing
            push += offset.normalize_or_zero() * (avoid_radius - distance);
        }
    }

    push
}

/// Unit push per axis away from any tank face closer than `margin`
pub fn wall_avoidance(
    position: Vec3,
    tank: &Aabb,
    margin: f32,
    mirrored_floor_axis: Option<Axis>,
) -> Vec3 {
    let mut push = Vec3::ZERO;

    for axis in Axis::ALL {
        let i = axis.index();
        if position[i] > tank.max[i] - margin {
            push[i] -= 1.0;
        }
        let floor = if mirrored_floor_axis == Some(axis) {
            tank.min[i] - margin
        } else {
            tank.min[i] + margin
        };
        if position[i] < floor {
            push[i] += 1.0;
        }
    }

    push
}

/// Repulsion from a single box, fading linearly to zero at `avoid_distance`
pub fn obstacle_push(position: Vec3, obstacle: &Aabb, avoid_distance: f32) -> Vec3 {
    let closest = obstacle.closest_point(position);
    let offset = position - closest;
    let distance = offset.length();

    if distance > avoid_distance {
        return Vec3::ZERO;
    }
    if distance < CONTACT_EPSILON {
        // Inside or on the surface: escape radially from the box center
        let outward = (position - obstacle.center())
            .try_normalize()
            .unwrap_or(WORLD_UP);
        return outward * avoid_distance;
    }

    offset / distance * ((avoid_distance - distance) / avoid_distance)
}

pub fn obstacle_avoidance(position: Vec3, obstacles: &[Aabb], avoid_distance: f32) -> Vec3 {
    obstacles
        .iter()
        .map(|obstacle| obstacle_push(position, obstacle, avoid_distance))
        .sum()
}
