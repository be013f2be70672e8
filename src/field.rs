use crate::accessor::FieldAccessor;
use crate::config::FluidConfig;
use crate::error::{FieldError, Result};
use crate::grid::GridDims;
use crate::solver::{self, StepParams};
use serde::{Deserialize, Serialize};

/// Exclusive upper bound on `width * height`.
pub const MAX_CELLS: usize = 1_000_000;

/// Visitor form of the `update` callbacks.
pub trait FieldHost {
    /// Stamp sources for this step.
    fn provide_input(&mut self, field: &mut FieldAccessor<'_>);
    /// Read back the advanced density.
    fn consume_output(&mut self, field: &FieldAccessor<'_>);
}

#[derive(Debug, Clone)]
struct Buffers {
    dims: GridDims,
    density: Vec<f32>,
    density_prev: Vec<f32>,
    velocity_x: Vec<f32>,
    velocity_x_prev: Vec<f32>,
    velocity_y: Vec<f32>,
    velocity_y_prev: Vec<f32>,
}

impl Buffers {
    fn new(dims: GridDims) -> Self {
        let size = dims.len();
        Self {
            dims,
            density: vec![0.0; size],
            density_prev: vec![0.0; size],
            velocity_x: vec![0.0; size],
            velocity_x_prev: vec![0.0; size],
            velocity_y: vec![0.0; size],
            velocity_y_prev: vec![0.0; size],
        }
    }

    fn clear(&mut self) {
        self.density.fill(0.0);
        self.density_prev.fill(0.0);
        self.velocity_x.fill(0.0);
        self.velocity_x_prev.fill(0.0);
        self.velocity_y.fill(0.0);
        self.velocity_y_prev.fill(0.0);
    }
}

/// Unpadded copy of a field's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub density: Vec<f32>,
    pub velocity_x: Vec<f32>,
    pub velocity_y: Vec<f32>,
}

impl FieldSnapshot {
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn total_density(&self) -> f32 {
        self.density.iter().sum()
    }
}

/// Density and velocity on a fixed grid, advanced by one stable-fluids step per
/// [`update`](FluidField::update).
///
/// The field starts unallocated unless built with [`FluidField::new`]; `update`
/// is a no-op until [`set_resolution`](FluidField::set_resolution) is called
/// and again after [`dispose`](FluidField::dispose).
#[derive(Debug, Clone, Default)]
pub struct FluidField {
    config: FluidConfig,
    buffers: Option<Buffers>,
    steps: u64,
}

impl FluidField {
    /// An allocated field with the default configuration.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_config(width, height, FluidConfig::default())
    }

    /// An allocated field with a custom configuration.
    pub fn with_config(width: usize, height: usize, config: FluidConfig) -> Result<Self> {
        let mut field = Self::unconfigured(config)?;
        field.set_resolution(width, height)?;
        Ok(field)
    }

    /// A field with no buffers yet.
    pub fn unconfigured(config: FluidConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            buffers: None,
            steps: 0,
        })
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn set_iterations(&mut self, iterations: usize) -> Result<()> {
        self.replace_config(FluidConfig {
            iterations,
            ..self.config
        })
    }

    pub fn set_dt(&mut self, dt: f32) -> Result<()> {
        self.replace_config(FluidConfig { dt, ..self.config })
    }

    pub fn set_damp(&mut self, damp: f32) -> Result<()> {
        self.replace_config(FluidConfig {
            damp,
            ..self.config
        })
    }

    pub fn replace_config(&mut self, config: FluidConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// (Re)allocates every buffer at `width x height` logical cells, zeroed.
    pub fn set_resolution(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidResolution { width, height });
        }
        match width.checked_mul(height) {
            Some(cells) if cells < MAX_CELLS => {}
            _ => {
                return Err(FieldError::ResolutionTooLarge {
                    width,
                    height,
                    max_cells: MAX_CELLS,
                });
            }
        }

        log::debug!("fluid field resolution set to {width}x{height}");
        self.buffers = Some(Buffers::new(GridDims::new(width, height)));
        self.steps = 0;
        Ok(())
    }

    /// Zeroes every buffer in place.
    pub fn reset(&mut self) {
        if let Some(buffers) = self.buffers.as_mut() {
            buffers.clear();
            log::debug!("fluid field reset");
        }
        self.steps = 0;
    }

    /// Releases the buffers; `update` becomes a no-op until the next
    /// `set_resolution`.
    pub fn dispose(&mut self) {
        if self.buffers.take().is_some() {
            log::debug!("fluid field disposed after {} steps", self.steps);
        }
        self.steps = 0;
    }

    pub fn is_configured(&self) -> bool {
        self.buffers.is_some()
    }

    /// `(width, height)` in logical cells, `(0, 0)` when unallocated.
    pub fn dimensions(&self) -> (usize, usize) {
        self.buffers
            .as_ref()
            .map_or((0, 0), |b| (b.dims.width, b.dims.height))
    }

    /// Updates completed since the last allocation or reset.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Advances the field by one step.
    ///
    /// `input` stamps sources through a writable accessor; `output` reads the
    /// advanced density. Neither is called when the field is unallocated.
    pub fn update<I, O>(&mut self, input: I, output: O)
    where
        I: FnOnce(&mut FieldAccessor<'_>),
        O: FnOnce(&FieldAccessor<'_>),
    {
        let config = self.config;
        let Some(buffers) = self.buffers.as_mut() else {
            return;
        };
        let dims = buffers.dims;

        buffers.density_prev.fill(0.0);
        buffers.velocity_x_prev.fill(0.0);
        buffers.velocity_y_prev.fill(0.0);

        for d in buffers.density.iter_mut() {
            *d *= config.damp;
        }

        let rejected = {
            let mut sources = FieldAccessor::new(
                dims,
                &mut buffers.density_prev,
                &mut buffers.velocity_x_prev,
                &mut buffers.velocity_y_prev,
            );
            input(&mut sources);
            sources.rejected()
        };
        if rejected > 0 {
            log::warn!("dropped {rejected} non-finite stamps");
        }

        solver::velocity_step(
            &mut buffers.velocity_x,
            &mut buffers.velocity_y,
            &mut buffers.velocity_x_prev,
            &mut buffers.velocity_y_prev,
            StepParams {
                dt: config.dt,
                coefficient: config.viscosity,
                iterations: config.iterations,
                dims,
            },
        );
        solver::density_step(
            &mut buffers.density,
            &mut buffers.density_prev,
            &buffers.velocity_x,
            &buffers.velocity_y,
            StepParams {
                dt: config.dt,
                coefficient: config.diffusion,
                iterations: config.iterations,
                dims,
            },
        );

        self.steps += 1;
        log::trace!("fluid field step {}", self.steps);

        let current = FieldAccessor::new(
            dims,
            &mut buffers.density,
            &mut buffers.velocity_x,
            &mut buffers.velocity_y,
        );
        output(&current);
    }

    /// [`update`](FluidField::update) driven by a [`FieldHost`].
    pub fn update_with<H: FieldHost + ?Sized>(&mut self, host: &mut H) {
        // Both phases need the host mutably, but never at the same time.
        let host = std::cell::RefCell::new(host);
        self.update(
            |field| host.borrow_mut().provide_input(field),
            |field| host.borrow_mut().consume_output(field),
        );
    }

    /// Copies the logical cells out of the padded buffers.
    pub fn snapshot(&self) -> Option<FieldSnapshot> {
        let buffers = self.buffers.as_ref()?;
        let dims = buffers.dims;

        let mut density = Vec::with_capacity(dims.cells());
        let mut velocity_x = Vec::with_capacity(dims.cells());
        let mut velocity_y = Vec::with_capacity(dims.cells());
        for y in 0..dims.height {
            let start = dims.idx(0, y);
            let end = start + dims.width;
            density.extend_from_slice(&buffers.density[start..end]);
            velocity_x.extend_from_slice(&buffers.velocity_x[start..end]);
            velocity_y.extend_from_slice(&buffers.velocity_y[start..end]);
        }

        Some(FieldSnapshot {
            width: dims.width,
            height: dims.height,
            density,
            velocity_x,
            velocity_y,
        })
    }
}
