//! Padded grid layout and the relaxation machinery shared by every solver stage.
//!
//! Each field is a flat `Vec<f32>` of `(width + 2) * (height + 2)` cells: the
//! logical grid plus a one-cell ghost border. Interior stencils can then read
//! `idx ± 1` and `idx ± stride` without edge checks; the ghost cells are only
//! ever written by [`set_boundary`].

/// Dimensions of a padded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

impl GridDims {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Row stride of the padded buffer.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width + 2
    }

    /// Buffer length including the ghost border.
    #[inline]
    pub fn len(&self) -> usize {
        (self.width + 2) * (self.height + 2)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of logical cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Buffer index of logical cell `(x, y)`.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        (x + 1) + (y + 1) * self.stride()
    }

    /// Buffer index of padded cell `(i, j)`, where `1..=width` is the interior.
    #[inline]
    pub(crate) fn padded(&self, i: usize, j: usize) -> usize {
        i + j * self.stride()
    }
}

/// Which quantity a boundary pass is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Density and pressure: ghost cells mirror their interior neighbor.
    Scalar,
    /// x-velocity: negated across the left/right walls, mirrored top/bottom.
    VelocityX,
    /// y-velocity: negated across the top/bottom walls, mirrored left/right.
    VelocityY,
}

/// Fills the ghost border of `x` from its interior.
pub fn set_boundary(boundary: Boundary, x: &mut [f32], dims: GridDims) {
    let GridDims { width, height } = dims;
    let stride = dims.stride();

    let horizontal = if boundary == Boundary::VelocityY { -1.0 } else { 1.0 };
    let vertical = if boundary == Boundary::VelocityX { -1.0 } else { 1.0 };

    for i in 1..=width {
        x[i] = horizontal * x[i + stride];
        x[i + (height + 1) * stride] = horizontal * x[i + height * stride];
    }
    for j in 1..=height {
        x[j * stride] = vertical * x[1 + j * stride];
        x[(width + 1) + j * stride] = vertical * x[width + j * stride];
    }

    let max_edge = (height + 1) * stride;
    x[0] = 0.5 * (x[1] + x[stride]);
    x[max_edge] = 0.5 * (x[1 + max_edge] + x[height * stride]);
    x[width + 1] = 0.5 * (x[width] + x[(width + 1) + stride]);
    x[(width + 1) + max_edge] = 0.5 * (x[width + max_edge] + x[(width + 1) + height * stride]);
}

/// Relaxes `x = (x0 + a * neighbors) / c` over the interior.
///
/// `a == 0, c == 1` reduces to a straight copy followed by one boundary pass.
pub fn solve_linear(
    boundary: Boundary,
    x: &mut [f32],
    x0: &[f32],
    a: f32,
    c: f32,
    iterations: usize,
    dims: GridDims,
) {
    let stride = dims.stride();

    if a == 0.0 && c == 1.0 {
        for j in 1..=dims.height {
            let row = dims.padded(1, j);
            x[row..row + dims.width].copy_from_slice(&x0[row..row + dims.width]);
        }
        set_boundary(boundary, x, dims);
        return;
    }

    let inv_c = 1.0 / c;
    for _ in 0..iterations {
        for j in 1..=dims.height {
            for i in 1..=dims.width {
                let idx = dims.padded(i, j);
                x[idx] = (x0[idx]
                    + a * (x[idx - 1] + x[idx + 1] + x[idx - stride] + x[idx + stride]))
                    * inv_c;
            }
        }
        set_boundary(boundary, x, dims);
    }
}

/// [`solve_linear`] for both velocity components in one sweep.
#[allow(clippy::too_many_arguments)]
pub fn solve_linear_pair(
    u: &mut [f32],
    u0: &[f32],
    v: &mut [f32],
    v0: &[f32],
    a: f32,
    c: f32,
    iterations: usize,
    dims: GridDims,
) {
    let stride = dims.stride();

    if a == 0.0 && c == 1.0 {
        for j in 1..=dims.height {
            let row = dims.padded(1, j);
            u[row..row + dims.width].copy_from_slice(&u0[row..row + dims.width]);
            v[row..row + dims.width].copy_from_slice(&v0[row..row + dims.width]);
        }
        set_boundary(Boundary::VelocityX, u, dims);
        set_boundary(Boundary::VelocityY, v, dims);
        return;
    }

    let inv_c = 1.0 / c;
    for _ in 0..iterations {
        for j in 1..=dims.height {
            for i in 1..=dims.width {
                let idx = dims.padded(i, j);
                u[idx] = (u0[idx]
                    + a * (u[idx - 1] + u[idx + 1] + u[idx - stride] + u[idx + stride]))
                    * inv_c;
                v[idx] = (v0[idx]
                    + a * (v[idx - 1] + v[idx + 1] + v[idx - stride] + v[idx + stride]))
                    * inv_c;
            }
        }
        set_boundary(Boundary::VelocityX, u, dims);
        set_boundary(Boundary::VelocityY, v, dims);
    }
}

/// `x += dt * s` over the whole buffer.
pub fn add_sources(x: &mut [f32], s: &[f32], dt: f32) {
    for (value, source) in x.iter_mut().zip(s) {
        *value += dt * source;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(dims: GridDims) -> Vec<f32> {
        let mut x = vec![0.0; dims.len()];
        for y in 0..dims.height {
            for x_ in 0..dims.width {
                x[dims.idx(x_, y)] = (1 + x_ + y * dims.width) as f32;
            }
        }
        x
    }

    #[test]
    fn test_index_mapping() {
        let dims = GridDims::new(4, 3);
        assert_eq!(dims.stride(), 6);
        assert_eq!(dims.len(), 30);
        assert_eq!(dims.idx(0, 0), 7);
        assert_eq!(dims.idx(3, 2), 4 + 3 * 6);
    }

    #[test]
    fn test_scalar_boundary_mirrors_interior() {
        let dims = GridDims::new(4, 3);
        let mut x = filled(dims);
        set_boundary(Boundary::Scalar, &mut x, dims);

        for i in 1..=4 {
            assert_eq!(x[dims.padded(i, 0)], x[dims.padded(i, 1)]);
            assert_eq!(x[dims.padded(i, 4)], x[dims.padded(i, 3)]);
        }
        for j in 1..=3 {
            assert_eq!(x[dims.padded(0, j)], x[dims.padded(1, j)]);
            assert_eq!(x[dims.padded(5, j)], x[dims.padded(4, j)]);
        }
        let corner = 0.5 * (x[dims.padded(1, 0)] + x[dims.padded(0, 1)]);
        assert_eq!(x[0], corner);
    }

    #[test]
    fn test_velocity_boundaries_negate_across_walls() {
        let dims = GridDims::new(4, 3);
        let mut u = filled(dims);
        set_boundary(Boundary::VelocityX, &mut u, dims);
        for j in 1..=3 {
            assert_eq!(u[dims.padded(0, j)], -u[dims.padded(1, j)]);
            assert_eq!(u[dims.padded(5, j)], -u[dims.padded(4, j)]);
        }
        for i in 1..=4 {
            assert_eq!(u[dims.padded(i, 0)], u[dims.padded(i, 1)]);
        }

        let mut v = filled(dims);
        set_boundary(Boundary::VelocityY, &mut v, dims);
        for i in 1..=4 {
            assert_eq!(v[dims.padded(i, 0)], -v[dims.padded(i, 1)]);
            assert_eq!(v[dims.padded(i, 4)], -v[dims.padded(i, 3)]);
        }
        for j in 1..=3 {
            assert_eq!(v[dims.padded(5, j)], v[dims.padded(4, j)]);
        }
    }

    #[test]
    fn test_zero_coefficient_solve_copies() {
        let dims = GridDims::new(5, 5);
        let source = filled(dims);
        let mut x = vec![0.0; dims.len()];
        solve_linear(Boundary::Scalar, &mut x, &source, 0.0, 1.0, 4, dims);
        for y in 0..5 {
            for x_ in 0..5 {
                assert_eq!(x[dims.idx(x_, y)], source[dims.idx(x_, y)]);
            }
        }
    }

    #[test]
    fn test_diffusing_solve_spreads_peak() {
        let dims = GridDims::new(7, 7);
        let mut source = vec![0.0; dims.len()];
        source[dims.idx(3, 3)] = 10.0;
        let mut x = vec![0.0; dims.len()];
        solve_linear(Boundary::Scalar, &mut x, &source, 1.0, 5.0, 8, dims);

        assert!(x[dims.idx(3, 3)] < 10.0);
        assert!(x[dims.idx(2, 3)] > 0.0);
        assert!(x[dims.idx(4, 3)] > 0.0);
        assert!(x.iter().all(|v| *v >= 0.0));
    }
}
