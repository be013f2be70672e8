use crate::error::{FieldError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Solver parameters for a [`FluidField`](crate::FluidField).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Relaxation sweeps per linear solve (diffusion and pressure).
    pub iterations: usize,
    /// Time step scaling source terms and advection distance.
    pub dt: f32,
    /// Multiplicative density decay per update, in `[0, 1)`.
    pub damp: f32,
    /// Density diffusion coefficient. Zero turns density diffusion into a copy.
    pub diffusion: f32,
    /// Velocity diffusion coefficient. Zero turns velocity diffusion into a copy.
    pub viscosity: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            iterations: 4,
            dt: 0.05,
            damp: 0.85,
            diffusion: 0.0,
            viscosity: 0.0,
        }
    }
}

impl FluidConfig {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(FieldError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(FieldError::InvalidConfig(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(0.0..1.0).contains(&self.damp) {
            return Err(FieldError::InvalidConfig(format!(
                "damp must lie in [0, 1), got {}",
                self.damp
            )));
        }
        for (name, value) in [("diffusion", self.diffusion), ("viscosity", self.viscosity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(FieldError::InvalidConfig(format!(
                    "{name} must be non-negative and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parses a (possibly partial) JSON object; missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
