use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_params::{SimulationConfig, SpawnConfig, SteeringConfig};

use super::aabb::Aabb;
use super::fish::{spawn_school, Fish};
use super::forces::SteeringForces;
use super::stats::FlockStats;
use crate::instancing::{write_transforms, InstanceTransform};

/// Owns the school and the static scene it swims through
#[derive(Debug, Clone)]
pub struct FlockSimulation {
    fish: Vec<Fish>,
    obstacles: Vec<Aabb>,
    tank: Aabb,
    spawn: SpawnConfig,
    steering: SteeringConfig,
    last_time: Option<f32>,
    transforms: Vec<InstanceTransform>,
    pub stats: FlockStats,
}

impl FlockSimulation {
    /// Spawn the school with a generator seeded from `config.world.seed`
    pub fn new(config: &SimulationConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        Self::with_rng(config, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Self {
        let tank = Aabb::from(&config.tank);
        let obstacles: Vec<Aabb> = config.obstacles.iter().map(Aabb::from).collect();

        let reach = config.spawn.ring_radius + config.spawn.jitter;
        let bias = config.spawn.vertical_bias;
        let ring = Aabb::from_corners(Vec3::new(-reach, bias, -reach), Vec3::new(reach, bias, reach));
        if !tank.contains(ring.min) || !tank.contains(ring.max) {
            log::warn!(
                "Spawn ring (reach {}) extends past the tank; fish start outside the walls.",
                reach
            );
        }

        let fish = spawn_school(&config.spawn, rng);
        log::info!("Spawned {} fish around {} obstacles", fish.len(), obstacles.len());

        Self::assemble(fish, tank, obstacles, config.spawn.clone(), config.steering.clone())
    }

    /// Build around an already placed school.
    ///
    /// `reset` respawns on the default ring until `with_spawn` supplies one
    /// that fits `tank`.
    pub fn from_parts(
        fish: Vec<Fish>,
        tank: Aabb,
        obstacles: Vec<Aabb>,
        steering: SteeringConfig,
    ) -> Self {
        let spawn = SpawnConfig {
            count: fish.len() as u32,
            ..SpawnConfig::default()
        };
        Self::assemble(fish, tank, obstacles, spawn, steering)
    }

    /// Ring `reset` respawns on; the population size stays that of the school
    pub fn with_spawn(mut self, spawn: SpawnConfig) -> Self {
        self.spawn = SpawnConfig {
            count: self.fish.len() as u32,
            ..spawn
        };
        self
    }

    fn assemble(
        fish: Vec<Fish>,
        tank: Aabb,
        obstacles: Vec<Aabb>,
        spawn: SpawnConfig,
        steering: SteeringConfig,
    ) -> Self {
        let mut sim = Self {
            fish,
            obstacles,
            tank,
            spawn,
            steering,
            last_time: None,
            transforms: Vec::new(),
            stats: FlockStats::default(),
        };
        write_transforms(&sim.fish, &mut sim.transforms);
        sim
    }

    /// Advance every fish to absolute simulation time `time` (seconds).
    ///
    /// All forces are sampled from the positions at the start of the call.
    pub fn update(&mut self, time: f32) {
        let interval = self.frame_interval(time);
        let displacement_scale = interval / self.steering.reference_interval;

        let positions: Vec<Vec3> = self.fish.iter().map(|f| f.position).collect();
        let steering = self.sample_steering(&positions, time);

        let turn_rate = self.steering.turn_rate;
        for (fish, steer) in self.fish.iter_mut().zip(steering) {
            if steer == Vec3::ZERO {
                log::trace!("zero steering at {:?}, holding heading", fish.position);
            }
            fish.steer(steer, turn_rate, displacement_scale);
        }

        self.last_time = Some(time);
        write_transforms(&self.fish, &mut self.transforms);
    }

    /// Seconds since the previous update; the first update moves one reference frame
    pub fn frame_interval(&self, time: f32) -> f32 {
        match self.last_time {
            Some(previous) => (time - previous).max(0.0),
            None => self.steering.reference_interval,
        }
    }

    /// Combined, unnormalized steering vector for each fish
    pub fn sample_steering(&self, positions: &[Vec3], time: f32) -> Vec<Vec3> {
        let steer = |i: usize| {
            SteeringForces::sample(i, positions, time, &self.tank, &self.obstacles, &self.steering)
                .combine(&self.steering)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..positions.len()).into_par_iter().map(steer).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..positions.len()).map(steer).collect()
        }
    }

    /// Unweighted contributions for one fish at the current state
    pub fn forces_on(&self, index: usize, time: f32) -> SteeringForces {
        let positions: Vec<Vec3> = self.fish.iter().map(|f| f.position).collect();
        SteeringForces::sample(index, &positions, time, &self.tank, &self.obstacles, &self.steering)
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    pub fn tank(&self) -> &Aabb {
        &self.tank
    }

    pub fn steering(&self) -> &SteeringConfig {
        &self.steering
    }

    /// Time of the last update, if any
    pub fn time(&self) -> Option<f32> {
        self.last_time
    }

    pub fn instance_transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// Transforms as raw bytes, ready for a vertex buffer upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    pub fn is_finite(&self) -> bool {
        self.fish.iter().all(Fish::is_finite)
    }

    pub fn update_stats(&mut self) {
        self.stats = FlockStats::compute(&self.fish, &self.tank);
    }

    /// Respawn a school of the same size from a new seed, using the spawn
    /// settings given at construction
    pub fn reset(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.fish = spawn_school(&self.spawn, &mut rng);
        self.last_time = None;
        self.stats = FlockStats::default();
        write_transforms(&self.fish, &mut self.transforms);
    }
}
