//! Pointer-trail stamping and coarse density sampling for hosts driving a
//! [`FluidField`](crate::FluidField).

use crate::accessor::FieldAccessor;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Turns successive pointer positions (in grid cells) into stamped lines.
#[derive(Debug, Clone)]
pub struct PointerTrail {
    /// Density written into every stamped cell.
    pub density: f32,
    /// Multiplier from pointer delta (cells per frame) to stamped velocity.
    pub velocity_scale: f32,
    last: Option<Vec2>,
}

impl Default for PointerTrail {
    fn default() -> Self {
        Self::new(80.0, 1.0)
    }
}

impl PointerTrail {
    pub fn new(density: f32, velocity_scale: f32) -> Self {
        Self {
            density,
            velocity_scale,
            last: None,
        }
    }

    pub fn last(&self) -> Option<Vec2> {
        self.last
    }

    /// Forget the previous position, so the next stamp starts a new stroke.
    pub fn lift(&mut self) {
        self.last = None;
    }

    /// Stamps the segment from the previous position to `pos` and returns the
    /// number of cells written.
    ///
    /// Every cell on the segment gets `density` and the pointer delta scaled by
    /// `velocity_scale`. The first stamp of a stroke writes density only.
    pub fn stamp(&mut self, field: &mut FieldAccessor<'_>, pos: Vec2) -> usize {
        let (width, height) = (field.width(), field.height());
        if width == 0 || height == 0 || !pos.is_finite() {
            return 0;
        }
        let max = Vec2::new((width - 1) as f32, (height - 1) as f32);
        let pos = pos.clamp(Vec2::ZERO, max);

        // The previous position may come from a larger grid
        let from = self.last.map_or(pos, |last| last.clamp(Vec2::ZERO, max));
        let delta = pos - from;
        let velocity = delta * self.velocity_scale;

        let steps = delta.abs().max_element().ceil().max(1.0) as usize;
        let mut stamped = 0;
        let mut previous_cell = None;
        for k in 0..=steps {
            let p = from.lerp(pos, k as f32 / steps as f32);
            let cell = (p.x.round() as usize, p.y.round() as usize);
            if previous_cell == Some(cell) {
                continue;
            }
            previous_cell = Some(cell);

            field.set_density(cell.0, cell.1, self.density);
            if self.last.is_some() {
                field.set_velocity(cell.0, cell.1, velocity);
            }
            stamped += 1;
        }

        self.last = Some(pos);
        stamped
    }
}

/// A visible mark derived from the density at one sampled cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub x: usize,
    pub y: usize,
    pub opacity: f32,
}

/// Samples every `stride`-th cell and returns a mark wherever density exceeds
/// `threshold`, with opacity smoothed from `density / max_density`.
pub fn sample_marks(
    field: &FieldAccessor<'_>,
    stride: usize,
    threshold: f32,
    max_density: f32,
) -> Vec<Mark> {
    let stride = stride.max(1);
    let mut marks = Vec::new();

    for y in (0..field.height()).step_by(stride) {
        for x in (0..field.width()).step_by(stride) {
            let density = field.density(x, y);
            if density > threshold {
                let t = if max_density > 0.0 {
                    (density / max_density).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                marks.push(Mark {
                    x,
                    y,
                    opacity: t * t * (3.0 - 2.0 * t),
                });
            }
        }
    }

    marks
}
