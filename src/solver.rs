//! Stable-fluids stages over padded buffers.
//!
//! Every function takes its buffers explicitly; the caller decides which
//! buffer plays "current" and which plays "previous" or scratch for a stage.

use crate::grid::{Boundary, GridDims, add_sources, set_boundary, solve_linear, solve_linear_pair};

/// Implicit diffusion of `x0` into `x`.
pub fn diffuse(
    boundary: Boundary,
    x: &mut [f32],
    x0: &[f32],
    coefficient: f32,
    dt: f32,
    iterations: usize,
    dims: GridDims,
) {
    let a = dt * coefficient * dims.cells() as f32;
    solve_linear(boundary, x, x0, a, 1.0 + 4.0 * a, iterations, dims);
}

/// Implicit diffusion of both velocity components.
#[allow(clippy::too_many_arguments)]
pub fn diffuse_pair(
    u: &mut [f32],
    u0: &[f32],
    v: &mut [f32],
    v0: &[f32],
    coefficient: f32,
    dt: f32,
    iterations: usize,
    dims: GridDims,
) {
    let a = dt * coefficient * dims.cells() as f32;
    solve_linear_pair(u, u0, v, v0, a, 1.0 + 4.0 * a, iterations, dims);
}

/// Semi-Lagrangian transport of `d0` along `(u, v)` into `d`.
pub fn advect(
    boundary: Boundary,
    d: &mut [f32],
    d0: &[f32],
    u: &[f32],
    v: &[f32],
    dt: f32,
    dims: GridDims,
) {
    let dt_x = dt * dims.width as f32;
    let dt_y = dt * dims.height as f32;
    let max_x = dims.width as f32 + 0.5;
    let max_y = dims.height as f32 + 0.5;

    for j in 1..=dims.height {
        for i in 1..=dims.width {
            let idx = dims.padded(i, j);

            // Backtrace, keeping the sample inside the interior plus half a cell
            let src_x = (i as f32 - dt_x * u[idx]).clamp(0.5, max_x);
            let src_y = (j as f32 - dt_y * v[idx]).clamp(0.5, max_y);

            let i0 = src_x.floor() as usize;
            let j0 = src_y.floor() as usize;
            let i1 = i0 + 1;
            let j1 = j0 + 1;

            let s1 = src_x - i0 as f32;
            let s0 = 1.0 - s1;
            let t1 = src_y - j0 as f32;
            let t0 = 1.0 - t1;

            d[idx] = s0 * (t0 * d0[dims.padded(i0, j0)] + t1 * d0[dims.padded(i0, j1)])
                + s1 * (t0 * d0[dims.padded(i1, j0)] + t1 * d0[dims.padded(i1, j1)]);
        }
    }
    set_boundary(boundary, d, dims);
}

/// Removes the divergent part of `(u, v)`; `p` and `div` are scratch.
pub fn project(
    u: &mut [f32],
    v: &mut [f32],
    p: &mut [f32],
    div: &mut [f32],
    iterations: usize,
    dims: GridDims,
) {
    let stride = dims.stride();
    let h = -0.5 / (dims.cells() as f32).sqrt();

    for j in 1..=dims.height {
        for i in 1..=dims.width {
            let idx = dims.padded(i, j);
            div[idx] = h * (u[idx + 1] - u[idx - 1] + v[idx + stride] - v[idx - stride]);
            p[idx] = 0.0;
        }
    }
    set_boundary(Boundary::Scalar, div, dims);
    set_boundary(Boundary::Scalar, p, dims);

    solve_linear(Boundary::Scalar, p, div, 1.0, 4.0, iterations, dims);

    let scale_x = 0.5 * dims.width as f32;
    let scale_y = 0.5 * dims.height as f32;
    for j in 1..=dims.height {
        for i in 1..=dims.width {
            let idx = dims.padded(i, j);
            u[idx] -= scale_x * (p[idx + 1] - p[idx - 1]);
            v[idx] -= scale_y * (p[idx + stride] - p[idx - stride]);
        }
    }
    set_boundary(Boundary::VelocityX, u, dims);
    set_boundary(Boundary::VelocityY, v, dims);
}

/// Parameters shared by one velocity or density step.
#[derive(Debug, Clone, Copy)]
pub struct StepParams {
    pub dt: f32,
    pub coefficient: f32,
    pub iterations: usize,
    pub dims: GridDims,
}

/// Advances velocity by one step.
///
/// On entry `u0`/`v0` hold the stamped sources; on exit `u`/`v` hold the new
/// velocity and `u0`/`v0` are scratch.
pub fn velocity_step(
    u: &mut [f32],
    v: &mut [f32],
    u0: &mut [f32],
    v0: &mut [f32],
    params: StepParams,
) {
    let StepParams {
        dt,
        coefficient,
        iterations,
        dims,
    } = params;

    add_sources(u, u0, dt);
    add_sources(v, v0, dt);

    // Diffuse into the source buffers and project there, using u/v as scratch
    diffuse_pair(u0, u, v0, v, coefficient, dt, iterations, dims);
    project(u0, v0, u, v, iterations, dims);

    // Transport the projected field along itself back into u/v
    advect(Boundary::VelocityX, u, u0, u0, v0, dt, dims);
    advect(Boundary::VelocityY, v, v0, u0, v0, dt, dims);
    project(u, v, u0, v0, iterations, dims);
}

/// Advances density by one step along the velocity `(u, v)`.
///
/// `d0` holds the stamped sources on entry and is scratch on exit.
pub fn density_step(d: &mut [f32], d0: &mut [f32], u: &[f32], v: &[f32], params: StepParams) {
    let StepParams {
        dt,
        coefficient,
        iterations,
        dims,
    } = params;

    add_sources(d, d0, dt);
    diffuse(Boundary::Scalar, d0, d, coefficient, dt, iterations, dims);
    advect(Boundary::Scalar, d, d0, u, v, dt, dims);
}
