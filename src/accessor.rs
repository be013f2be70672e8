use crate::grid::GridDims;
use glam::Vec2;

/// Logical-coordinate view onto one density/velocity triple of a field.
///
/// During the input phase it is bound to the source buffers and handed out as
/// `&mut`; during the output phase it is bound to the current buffers and
/// handed out as `&`, so only the getters are reachable.
///
/// Coordinates must satisfy `x < width` and `y < height`. This is asserted in
/// debug builds only.
pub struct FieldAccessor<'a> {
    dims: GridDims,
    density: &'a mut [f32],
    velocity_x: &'a mut [f32],
    velocity_y: &'a mut [f32],
    rejected: usize,
}

impl<'a> FieldAccessor<'a> {
    pub(crate) fn new(
        dims: GridDims,
        density: &'a mut [f32],
        velocity_x: &'a mut [f32],
        velocity_y: &'a mut [f32],
    ) -> Self {
        Self {
            dims,
            density,
            velocity_x,
            velocity_y,
            rejected: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(
            x < self.dims.width && y < self.dims.height,
            "cell ({x}, {y}) outside {}x{} field",
            self.dims.width,
            self.dims.height
        );
        self.dims.idx(x, y)
    }

    pub fn density(&self, x: usize, y: usize) -> f32 {
        self.density[self.index(x, y)]
    }

    pub fn velocity(&self, x: usize, y: usize) -> Vec2 {
        let idx = self.index(x, y);
        Vec2::new(self.velocity_x[idx], self.velocity_y[idx])
    }

    /// Overwrites the density at a cell. Non-finite values are dropped.
    pub fn set_density(&mut self, x: usize, y: usize, density: f32) {
        let idx = self.index(x, y);
        if !density.is_finite() {
            self.rejected += 1;
            return;
        }
        self.density[idx] = density;
    }

    /// Overwrites the velocity at a cell. Non-finite values are dropped.
    pub fn set_velocity(&mut self, x: usize, y: usize, velocity: Vec2) {
        let idx = self.index(x, y);
        if !velocity.is_finite() {
            self.rejected += 1;
            return;
        }
        self.velocity_x[idx] = velocity.x;
        self.velocity_y[idx] = velocity.y;
    }

    /// Number of stamps dropped for being NaN or infinite.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}
