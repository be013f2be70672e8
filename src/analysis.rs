use crate::error::Result;
use crate::field::FieldSnapshot;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetrics {
    pub frame: usize,
    pub total_density: f32,
    pub max_density: f32,
    pub avg_density: f32,
    pub max_velocity: f32,
    pub total_kinetic_energy: f32,
    /// Mean absolute central-difference divergence over interior cells.
    pub velocity_divergence: f32,
}

impl FieldMetrics {
    pub fn analyze(snapshot: &FieldSnapshot, frame: usize) -> Self {
        let size = (snapshot.width * snapshot.height).max(1) as f32;

        #[cfg(not(target_arch = "wasm32"))]
        let (total_density, max_density, max_velocity, total_kinetic_energy) = snapshot
            .density
            .par_iter()
            .zip(&snapshot.velocity_x)
            .zip(&snapshot.velocity_y)
            .map(|((&d, &vx), &vy)| {
                let speed_sq = vx * vx + vy * vy;
                (d, d, speed_sq.sqrt(), 0.5 * d * speed_sq)
            })
            .reduce(
                || (0.0, 0.0, 0.0, 0.0),
                |(t1, m1, v1, e1), (t2, m2, v2, e2)| (t1 + t2, m1.max(m2), v1.max(v2), e1 + e2),
            );

        #[cfg(target_arch = "wasm32")]
        let (total_density, max_density, max_velocity, total_kinetic_energy) = snapshot
            .density
            .iter()
            .zip(&snapshot.velocity_x)
            .zip(&snapshot.velocity_y)
            .fold((0.0f32, 0.0f32, 0.0f32, 0.0f32), |(t, m, v, e), ((&d, &vx), &vy)| {
                let speed_sq = vx * vx + vy * vy;
                (t + d, m.max(d), v.max(speed_sq.sqrt()), e + 0.5 * d * speed_sq)
            });

        Self {
            frame,
            total_density,
            max_density,
            avg_density: total_density / size,
            max_velocity,
            total_kinetic_energy,
            velocity_divergence: mean_abs_divergence(snapshot),
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "frame {}: total density {:.4}, max density {:.4}, max velocity {:.4}, kinetic energy {:.4}, divergence {:.6}",
            self.frame,
            self.total_density,
            self.max_density,
            self.max_velocity,
            self.total_kinetic_energy,
            self.velocity_divergence
        );
    }
}

fn mean_abs_divergence(snapshot: &FieldSnapshot) -> f32 {
    let (width, height) = (snapshot.width, snapshot.height);
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut total = 0.0;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let idx = snapshot.index(x, y);
            let divergence = (snapshot.velocity_x[idx + 1] - snapshot.velocity_x[idx - 1]
                + snapshot.velocity_y[idx + width]
                - snapshot.velocity_y[idx - width])
                / 2.0;
            total += divergence.abs();
        }
    }
    total / ((width - 2) * (height - 2)) as f32
}

#[derive(Debug, Default)]
pub struct AnalysisRecorder {
    pub metrics_history: Vec<FieldMetrics>,
}

impl AnalysisRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, snapshot: &FieldSnapshot, frame: usize) -> &FieldMetrics {
        self.metrics_history.push(FieldMetrics::analyze(snapshot, frame));
        &self.metrics_history[self.metrics_history.len() - 1]
    }

    pub fn log_trends(&self) {
        let (Some(first), Some(last)) = (self.metrics_history.first(), self.metrics_history.last())
        else {
            return;
        };
        if self.metrics_history.len() < 2 {
            return;
        }

        log::info!(
            "density change over frames {}..{}: {:.4} -> {:.4} ({:+.2}%)",
            first.frame,
            last.frame,
            first.total_density,
            last.total_density,
            percent_change(first.total_density, last.total_density)
        );
        log::info!(
            "kinetic energy change: {:.4} -> {:.4} ({:+.2}%)",
            first.total_kinetic_energy,
            last.total_kinetic_energy,
            percent_change(first.total_kinetic_energy, last.total_kinetic_energy)
        );
    }

    /// Writes one JSON object per recorded frame.
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<()> {
        for metrics in &self.metrics_history {
            serde_json::to_writer(&mut writer, metrics)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

fn percent_change(from: f32, to: f32) -> f32 {
    (to - from) / from.abs().max(0.001) * 100.0
}
