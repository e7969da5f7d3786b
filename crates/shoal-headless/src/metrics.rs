use std::fs::File;
use std::path::Path;
use std::time::Duration;
use csv::Writer;
use shoal_core::sim::FlockStats;

/// Metrics writer for CSV output and performance logging
pub struct MetricsWriter {
    csv_writer: Writer<File>,
    step_count: u32,
    polarization_history: Vec<f32>, // Recent polarization for the cohesion trend
}

impl MetricsWriter {
    /// Create a new metrics writer
    pub fn new(output_dir: &Path) -> Result<Self, anyhow::Error> {
        let csv_path = output_dir.join("metrics.csv");
        let file = File::create(&csv_path)?;

        let mut csv_writer = Writer::from_writer(file);

        csv_writer.write_record([
            "step", "time",
            "fish_count", "mean_speed", "polarization", "polarization_trend",
            "centroid_x", "centroid_y", "centroid_z",
            "mean_nearest_neighbor", "outside_tank",
            "wall_time_ms", "fps_proxy",
        ])?;

        Ok(Self {
            csv_writer,
            step_count: 0,
            polarization_history: Vec::new(),
        })
    }

    /// Mean change in polarization across the recorded window; positive while the school aligns
    fn polarization_trend(&self) -> f32 {
        if self.polarization_history.len() < 2 {
            return 0.0;
        }
        let first = self.polarization_history[0];
        let last = self.polarization_history[self.polarization_history.len() - 1];
        (last - first) / (self.polarization_history.len() - 1) as f32
    }

    /// Write metrics for a single simulation step
    pub fn write_step(
        &mut self,
        step: u32,
        time: f32,
        stats: &FlockStats,
        step_time: Duration,
    ) -> Result<(), anyhow::Error> {
        self.polarization_history.push(stats.polarization);

        // Keep only last 20 entries
        if self.polarization_history.len() > 20 {
            self.polarization_history.remove(0);
        }

        let wall_time_ms = step_time.as_secs_f64() * 1000.0;
        let fps_proxy = if wall_time_ms > 0.0 { 1000.0 / wall_time_ms } else { 0.0 };

        self.csv_writer.write_record(&[
            step.to_string(),
            time.to_string(),
            stats.fish_count.to_string(),
            stats.mean_speed.to_string(),
            stats.polarization.to_string(),
            self.polarization_trend().to_string(),
            stats.centroid.x.to_string(),
            stats.centroid.y.to_string(),
            stats.centroid.z.to_string(),
            stats.mean_nearest_neighbor.to_string(),
            stats.outside_tank.to_string(),
            wall_time_ms.to_string(),
            fps_proxy.to_string(),
        ])?;

        self.csv_writer.flush()?;
        self.step_count += 1;

        Ok(())
    }

    /// Get the number of steps written
    #[allow(dead_code)]
    pub fn step_count(&self) -> u32 {
        self.step_count
    }
}
