use rand::rngs::mock::StepRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shoal_core::sim::{random_heading, spawn_school, Aabb, Fish, FlockSimulation};
use shoal_core::{SimulationConfig, SpawnConfig, SteeringConfig};
use std::f32::consts::TAU;

/// Word that `Rng::gen::<f32>()` turns into exactly 0.5, i.e. a zero heading component
const MIDPOINT: u32 = 0x8000_0000;

/// Replays a fixed list of words, then repeats the last one
struct ScriptedRng {
    words: Vec<u32>,
    next: usize,
}

impl ScriptedRng {
    fn new(words: Vec<u32>) -> Self {
        Self { words, next: 0 }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let word = self.words[self.next.min(self.words.len() - 1)];
        self.next += 1;
        word
    }

    fn next_u64(&mut self) -> u64 {
        u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[test]
fn zero_jitter_places_fish_exactly_on_the_ring() {
    let config = SpawnConfig {
        count: 8,
        jitter: 0.0,
        ..SpawnConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let school = spawn_school(&config, &mut rng);

    assert_eq!(school.len(), 8);
    for (i, fish) in school.iter().enumerate() {
        let angle = i as f32 / 8.0 * TAU;
        assert!((fish.position.x - angle.cos() * config.ring_radius).abs() < 1e-5);
        assert!((fish.position.z - angle.sin() * config.ring_radius).abs() < 1e-5);
        assert_eq!(fish.position.y, config.vertical_bias);
    }
}

#[test]
fn spawned_fish_respect_ranges() {
    let config = SpawnConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let school = spawn_school(&config, &mut rng);

    let max_y_offset = config.jitter * config.vertical_scale;
    for fish in &school {
        assert!((fish.velocity.length() - 1.0).abs() < 1e-5);
        assert!(fish.speed >= config.speed_min && fish.speed < config.speed_max);
        assert_eq!(fish.radius, config.radius);
        assert!((fish.position.y - config.vertical_bias).abs() <= max_y_offset + 1e-5);

        let ring_distance = (fish.position.x.powi(2) + fish.position.z.powi(2)).sqrt();
        let slack = config.jitter * std::f32::consts::SQRT_2 + 1e-4;
        assert!((ring_distance - config.ring_radius).abs() <= slack);

        let forward = fish.orientation * glam::Vec3::Z;
        assert!(forward.abs_diff_eq(fish.velocity, 1e-5));
    }
}

#[test]
fn same_seed_same_school() {
    let config = SimulationConfig::default();
    let a = FlockSimulation::new(&config);
    let b = FlockSimulation::new(&config);
    assert_eq!(a.fish(), b.fish());

    let mut other = config.clone();
    other.world.seed += 1;
    let c = FlockSimulation::new(&other);
    assert_ne!(a.fish(), c.fish());
}

#[test]
fn step_rng_double_yields_usable_headings() {
    // Constant draws: every component lands on the same value
    let mut rng = StepRng::new(0, 0);
    let heading = random_heading(&mut rng);
    assert!((heading.length() - 1.0).abs() < 1e-5);
    assert!(heading.x == heading.y && heading.y == heading.z);
}

#[test]
fn zero_heading_draw_is_resampled() {
    // First draw is the origin of the cube, the second points along -1,-1,-1
    let mut rng = ScriptedRng::new(vec![MIDPOINT, MIDPOINT, MIDPOINT, 0, 0, 0]);
    let heading = random_heading(&mut rng);

    assert!(heading.abs_diff_eq(glam::Vec3::splat(-1.0).normalize(), 1e-6));
    assert_eq!(rng.next, 6);
}

#[test]
fn endless_zero_draws_fall_back_to_forward() {
    let mut rng = ScriptedRng::new(vec![MIDPOINT]);
    assert_eq!(random_heading(&mut rng), glam::Vec3::Z);
}

#[test]
fn degenerate_speed_range_uses_minimum() {
    let config = SpawnConfig {
        count: 4,
        speed_min: 0.025,
        speed_max: 0.025,
        ..SpawnConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for fish in spawn_school(&config, &mut rng) {
        assert_eq!(fish.speed, 0.025);
    }
}

#[test]
fn reset_keeps_population_size() {
    let mut sim = FlockSimulation::new(&SimulationConfig::default());
    let before = sim.fish().to_vec();
    sim.update(0.5);
    sim.reset(99);

    assert_eq!(sim.len(), before.len());
    assert_eq!(sim.time(), None);
    assert_ne!(sim.fish(), &before[..]);
}

#[test]
fn reset_respawns_on_supplied_ring() {
    let tank = Aabb::from_corners(glam::Vec3::splat(-2.0), glam::Vec3::splat(2.0));
    let fish = vec![
        Fish::new(glam::Vec3::new(0.5, 0.0, 0.0), glam::Vec3::Z, 0.02, 0.15),
        Fish::new(glam::Vec3::new(-0.5, 0.0, 0.0), glam::Vec3::X, 0.02, 0.15),
    ];
    let ring = SpawnConfig {
        count: 40,
        ring_radius: 1.0,
        jitter: 0.0,
        vertical_bias: 0.25,
        ..SpawnConfig::default()
    };
    let mut sim = FlockSimulation::from_parts(fish, tank, vec![], SteeringConfig::default())
        .with_spawn(ring);

    sim.reset(5);

    assert_eq!(sim.len(), 2);
    for fish in sim.fish() {
        let ring_distance = (fish.position.x.powi(2) + fish.position.z.powi(2)).sqrt();
        assert!((ring_distance - 1.0).abs() < 1e-5);
        assert_eq!(fish.position.y, 0.25);
        assert!(tank.contains(fish.position));
    }
}
