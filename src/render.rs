use crate::field::FieldSnapshot;
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

/// Rasterizes snapshots at a fixed output size with nearest-cell sampling.
pub struct Renderer {
    width: u32,
    height: u32,
    /// Density mapped to full white.
    pub max_density: f32,
    /// Velocity component mapped to full channel intensity.
    pub max_velocity: f32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            max_density: 10.0,
            max_velocity: 1.0,
        }
    }

    fn cell_for(&self, snapshot: &FieldSnapshot, x: u32, y: u32) -> Option<usize> {
        let sim_x = (x as f32 / self.width as f32 * snapshot.width as f32) as usize;
        let sim_y = (y as f32 / self.height as f32 * snapshot.height as f32) as usize;
        (sim_x < snapshot.width && sim_y < snapshot.height).then(|| snapshot.index(sim_x, sim_y))
    }

    pub fn render_density(&self, snapshot: &FieldSnapshot) -> GrayImage {
        let mut img = ImageBuffer::new(self.width, self.height);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let intensity = self
                .cell_for(snapshot, x, y)
                .map(|idx| (snapshot.density[idx] / self.max_density).clamp(0.0, 1.0))
                .unwrap_or(0.0);
            *pixel = Luma([(intensity * 255.0) as u8]);
        }

        img
    }

    /// Red encodes |vx|, green encodes |vy|.
    pub fn render_velocity(&self, snapshot: &FieldSnapshot) -> RgbImage {
        let mut img = ImageBuffer::new(self.width, self.height);

        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = match self.cell_for(snapshot, x, y) {
                Some(idx) => {
                    let r = (snapshot.velocity_x[idx].abs() / self.max_velocity).min(1.0);
                    let g = (snapshot.velocity_y[idx].abs() / self.max_velocity).min(1.0);
                    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, 128])
                }
                None => Rgb([0, 0, 0]),
            };
        }

        img
    }
}
