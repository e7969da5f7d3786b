use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use shoal_params::SpawnConfig;
use std::f32::consts::TAU;

/// Up reference used to keep fish rolled upright
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Resample budget for the initial heading before falling back to +Z
const MAX_HEADING_DRAWS: usize = 16;

/// Heading/desired cosine at or below which the pair counts as opposite
const REVERSAL_DOT: f32 = -0.9999;

/// A single simulated fish
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fish {
    pub position: Vec3,
    pub velocity: Vec3,    // Unit heading; speed is applied separately
    pub speed: f32,        // Distance per reference frame, fixed for life
    pub orientation: Quat, // Maps local +Z onto the heading
    pub radius: f32,
}

impl Fish {
    pub fn new(position: Vec3, heading: Vec3, speed: f32, radius: f32) -> Self {
        let velocity = heading.try_normalize().unwrap_or(Vec3::Z);
        Self {
            position,
            velocity,
            speed,
            orientation: look_rotation(velocity),
            radius,
        }
    }

    /// Turn toward `steering` by at most `turn_rate` and swim forward.
    ///
    /// `displacement_scale` is the ratio of the elapsed frame interval to the
    /// reference interval the speed is expressed in.
    pub fn steer(&mut self, steering: Vec3, turn_rate: f32, displacement_scale: f32) {
        let forward = steer_heading(self.velocity, steering, turn_rate);
        let basis = orthonormal_basis(forward);

        self.orientation = Quat::from_mat3(&basis).normalize();
        self.velocity = basis.z_axis;
        self.position += self.velocity * self.speed * displacement_scale;
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.orientation.is_finite()
    }
}

/// Blend `current` toward the direction of `steering`.
///
/// A zero steering vector, or a blend that cancels out, keeps the current heading.
/// A reversal is started by turning toward the fish's right, since a straight
/// blend between opposite headings never changes direction.
pub fn steer_heading(current: Vec3, steering: Vec3, turn_rate: f32) -> Vec3 {
    let mut desired = steering.try_normalize().unwrap_or(current);
    if current.dot(desired) <= REVERSAL_DOT {
        desired = orthonormal_basis(current).x_axis;
    }
    current
        .lerp(desired, turn_rate)
        .try_normalize()
        .unwrap_or(current)
}

/// Right/up/forward basis for a unit `forward`, with roll pinned to world up
pub fn orthonormal_basis(forward: Vec3) -> Mat3 {
    let right = match WORLD_UP.cross(forward).try_normalize() {
        Some(right) => right,
        None => {
            log::trace!("heading {:?} parallel to world up, picking arbitrary roll", forward);
            forward.any_orthonormal_vector()
        }
    };
    let up = forward.cross(right).normalize();
    Mat3::from_cols(right, up, forward)
}

pub fn look_rotation(forward: Vec3) -> Quat {
    Quat::from_mat3(&orthonormal_basis(forward)).normalize()
}

/// Uniform direction draw from the [-1, 1) cube, resampling degenerate draws
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    for _ in 0..MAX_HEADING_DRAWS {
        let unit = Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>());
        let sample = unit * 2.0 - Vec3::ONE;
        if let Some(heading) = sample.try_normalize() {
            return heading;
        }
    }
    Vec3::Z
}

/// Place `config.count` fish on a jittered horizontal ring around the origin
pub fn spawn_school<R: Rng + ?Sized>(config: &SpawnConfig, rng: &mut R) -> Vec<Fish> {
    let count = config.count as usize;
    let mut school = Vec::with_capacity(count);

    for i in 0..count {
        let angle = i as f32 / count as f32 * TAU;

        let jx = jitter(rng, config.jitter);
        let jy = jitter(rng, config.jitter);
        let jz = jitter(rng, config.jitter);
        let position = Vec3::new(
            angle.cos() * config.ring_radius + jx,
            jy * config.vertical_scale + config.vertical_bias,
            angle.sin() * config.ring_radius + jz,
        );

        let heading = random_heading(rng);
        let speed = if config.speed_max > config.speed_min {
            rng.gen_range(config.speed_min..config.speed_max)
        } else {
            config.speed_min
        };

        school.push(Fish::new(position, heading, speed, config.radius));
    }

    school
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, offset: f32) -> f32 {
    if offset > 0.0 {
        rng.gen_range(-offset..=offset)
    } else {
        0.0
    }
}
