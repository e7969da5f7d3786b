use std::fs::File;
use std::path::{Path, PathBuf};
use csv::Writer;
use glam::{Vec2, Vec3};
use image::{ImageBuffer, Rgb, RgbImage};
use shoal_core::sim::{Aabb, FlockSimulation};
use anyhow::Result;

const IMAGE_SIZE: u32 = 256;

const WATER: Rgb<u8> = Rgb([12, 32, 64]);
const OBSTACLE: Rgb<u8> = Rgb([96, 96, 96]);
const FISH: Rgb<u8> = Rgb([255, 190, 60]);
const STRAY: Rgb<u8> = Rgb([255, 40, 40]);

/// Snapshot writer for school images and fish state
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    /// Create a new snapshot writer
    pub fn new(output_dir: &Path) -> Result<Self> {
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write fish positions, headings and orientations to CSV
    pub fn write_fish_snapshot(&self, step: u32, sim: &FlockSimulation) -> Result<()> {
        let filename = format!("fish_{:04}.csv", step);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let mut csv_writer = Writer::from_writer(file);

        csv_writer.write_record([
            "id", "x", "y", "z", "vx", "vy", "vz", "speed", "qx", "qy", "qz", "qw",
        ])?;

        for (i, fish) in sim.fish().iter().enumerate() {
            let q = fish.orientation;
            csv_writer.write_record(&[
                i.to_string(),
                fish.position.x.to_string(),
                fish.position.y.to_string(),
                fish.position.z.to_string(),
                fish.velocity.x.to_string(),
                fish.velocity.y.to_string(),
                fish.velocity.z.to_string(),
                fish.speed.to_string(),
                q.x.to_string(),
                q.y.to_string(),
                q.z.to_string(),
                q.w.to_string(),
            ])?;
        }

        csv_writer.flush()?;

        Ok(())
    }

    /// Write a top-down (x-z) view of the tank as PNG
    pub fn write_school_image(&self, step: u32, sim: &FlockSimulation) -> Result<()> {
        let filename = format!("school_{:04}.png", step);
        render_top_down(sim, IMAGE_SIZE).save(self.output_dir.join(filename))?;
        Ok(())
    }
}

/// Map world x/z onto pixel coordinates spanning the tank footprint
struct TopDown {
    origin: Vec2,
    scale: Vec2,
}

impl TopDown {
    fn new(tank: &Aabb, size: u32) -> Self {
        let origin = Vec2::new(tank.min.x, tank.min.z);
        let extent = Vec2::new(tank.max.x, tank.max.z) - origin;
        Self {
            origin,
            scale: Vec2::splat(size as f32) / extent,
        }
    }

    fn pixel(&self, point: Vec3, size: u32) -> (u32, u32) {
        let p = (Vec2::new(point.x, point.z) - self.origin) * self.scale;
        let max = (size - 1) as f32;
        (p.x.clamp(0.0, max) as u32, p.y.clamp(0.0, max) as u32)
    }
}

pub fn render_top_down(sim: &FlockSimulation, size: u32) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::from_pixel(size, size, WATER);
    let view = TopDown::new(sim.tank(), size);

    for obstacle in sim.obstacles() {
        let (x0, y0) = view.pixel(obstacle.min, size);
        let (x1, y1) = view.pixel(obstacle.max, size);
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, OBSTACLE);
            }
        }
    }

    let tank = sim.tank();
    for fish in sim.fish() {
        if !fish.position.is_finite() {
            continue;
        }
        let color = if tank.contains(fish.position) { FISH } else { STRAY };
        let (x, y) = view.pixel(fish.position, size);
        for dy in 0..2 {
            for dx in 0..2 {
                if x + dx < size && y + dy < size {
                    img.put_pixel(x + dx, y + dy, color);
                }
            }
        }
    }

    img
}
