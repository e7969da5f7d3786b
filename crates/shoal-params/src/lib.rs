//! Shared parameter types for the Shoal flocking simulation
//!
//! This crate contains all parameter structures used by the simulation core and
//! the headless runner so both agree on the same reference constants.

/// Run configuration for a host driving the simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    pub steps: u32,
    pub dt: f32,   // Host frame interval in seconds
    pub seed: u64,
}

/// Soft boundary of the tank, steered away from but never clamped
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TankConfig {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Initial placement of the school
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnConfig {
    pub count: u32,
    pub ring_radius: f32,
    pub jitter: f32,         // Uniform offset range per axis
    pub vertical_scale: f32, // Applied to the y jitter only
    pub vertical_bias: f32,
    pub speed_min: f32,      // Distance per reference frame
    pub speed_max: f32,
    pub radius: f32,
}

/// World axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Steering weights and avoidance parameters
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringConfig {
    pub flow_weight: f32,
    pub neighbor_weight: f32,
    pub wall_weight: f32,
    pub obstacle_weight: f32,
    pub avoid_radius: f32,            // Neighbor repulsion radius
    pub wall_margin: f32,
    pub obstacle_avoid_distance: f32,
    pub turn_rate: f32,               // Heading blend factor per frame
    pub reference_interval: f32,      // Frame duration the speeds are tuned for
    /// Axis whose floor test uses `min - margin` instead of `min + margin`.
    ///
    /// The demo scenes shipped with this mirrored comparison on one axis, which
    /// lets fish sink up to a margin below the floor before being pushed back.
    /// `None` applies the symmetric test on all three axes.
    pub mirrored_floor_axis: Option<Axis>,
}

/// Static obstacle given by two opposite corners in any order
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleConfig {
    pub corners: [[f32; 3]; 2],
}

/// Complete simulation configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub tank: TankConfig,
    pub spawn: SpawnConfig,
    pub steering: SteeringConfig,
    pub obstacles: Vec<ObstacleConfig>,
}

pub const REFERENCE_INTERVAL: f32 = 1.0 / 60.0;

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            steps: 3600,
            dt: REFERENCE_INTERVAL,
            seed: 1337,
        }
    }
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            min: [-5.0, -1.5, -5.0],
            max: [5.0, 4.0, 5.0],
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            count: 200,
            ring_radius: 2.5,
            jitter: 1.0,
            vertical_scale: 0.4,
            vertical_bias: 1.0,
            speed_min: 0.020,
            speed_max: 0.030,
            radius: 0.15,
        }
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            flow_weight: 1.0,
            neighbor_weight: 0.5,
            wall_weight: 0.5,
            obstacle_weight: 1.0,
            avoid_radius: 0.4,
            wall_margin: 0.5,
            obstacle_avoid_distance: 1.5,
            turn_rate: 0.1,
            reference_interval: REFERENCE_INTERVAL,
            mirrored_floor_axis: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            tank: TankConfig::default(),
            spawn: SpawnConfig::default(),
            steering: SteeringConfig::default(),
            obstacles: vec![
                // Station platform
                ObstacleConfig {
                    corners: [[-1.0, -1.5, -1.0], [1.0, 1.0, 1.0]],
                },
                // Train car, corners deliberately given max-first
                ObstacleConfig {
                    corners: [[4.0, 0.5, -2.0], [2.5, -1.5, -3.5]],
                },
            ],
        }
    }
}

impl SimulationConfig {
    /// Check every parameter the simulator relies on being well-formed
    pub fn validate(&self) -> Result<(), String> {
        if self.spawn.count == 0 {
            return Err("Fish count must be greater than 0".to_string());
        }
        if self.spawn.speed_min < 0.0 || self.spawn.speed_max < self.spawn.speed_min {
            return Err(format!(
                "Invalid speed range: [{}, {}]",
                self.spawn.speed_min, self.spawn.speed_max
            ));
        }
        if self.spawn.radius <= 0.0 || self.spawn.jitter < 0.0 || self.spawn.ring_radius < 0.0 {
            return Err("Spawn radius must be positive and ring/jitter non-negative".to_string());
        }

        let s = &self.steering;
        if s.avoid_radius <= 0.0 {
            return Err(format!("avoid_radius must be positive, got {}", s.avoid_radius));
        }
        if s.wall_margin < 0.0 {
            return Err(format!("wall_margin must be non-negative, got {}", s.wall_margin));
        }
        if s.obstacle_avoid_distance <= 0.0 {
            return Err(format!(
                "obstacle_avoid_distance must be positive, got {}",
                s.obstacle_avoid_distance
            ));
        }
        if !(s.turn_rate > 0.0 && s.turn_rate <= 1.0) {
            return Err(format!("turn_rate must lie in (0, 1], got {}", s.turn_rate));
        }
        if s.reference_interval <= 0.0 {
            return Err("reference_interval must be positive".to_string());
        }
        if self.world.dt <= 0.0 {
            return Err("Time step (dt) must be positive".to_string());
        }

        for axis in Axis::ALL {
            let i = axis.index();
            if self.tank.min[i] >= self.tank.max[i] {
                return Err(format!(
                    "Tank bounds inverted on {:?}: min {} >= max {}",
                    axis, self.tank.min[i], self.tank.max[i]
                ));
            }
        }

        Ok(())
    }

    /// Log the effective parameters for debugging
    pub fn log_summary(&self) {
        log::info!(
            "Fish: {} (speed {}..{}, radius {})",
            self.spawn.count, self.spawn.speed_min, self.spawn.speed_max, self.spawn.radius
        );
        log::info!("Tank: {:?} .. {:?}", self.tank.min, self.tank.max);
        log::info!(
            "Weights: flow={} neighbor={} wall={} obstacle={}",
            self.steering.flow_weight,
            self.steering.neighbor_weight,
            self.steering.wall_weight,
            self.steering.obstacle_weight
        );
        log::info!("Obstacles: {}", self.obstacles.len());
        if let Some(axis) = self.steering.mirrored_floor_axis {
            log::info!("Mirrored floor test on {:?} axis", axis);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_tank() {
        let mut config = SimulationConfig::default();
        config.tank.min[1] = 10.0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("Y"), "unexpected message: {}", err);
    }

    #[test]
    fn rejects_bad_turn_rate_and_speed_range() {
        let mut config = SimulationConfig::default();
        config.steering.turn_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.spawn.speed_max = 0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn axis_indices() {
        let indices: Vec<usize> = Axis::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
