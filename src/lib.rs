//! Real-time 2D stable-fluids density field for cursor-driven trail effects.
//!
//! A [`FluidField`] owns padded density and velocity buffers and advances them
//! one step per [`FluidField::update`]. Hosts stamp sources and read density
//! back through a [`FieldAccessor`].

pub mod accessor;
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod grid;
pub mod render;
pub mod solver;
pub mod trail;

pub use accessor::FieldAccessor;
pub use analysis::{AnalysisRecorder, FieldMetrics};
pub use config::FluidConfig;
pub use error::{FieldError, Result};
pub use export::{ImageExporter, export_snapshot_json};
pub use field::{FieldHost, FieldSnapshot, FluidField, MAX_CELLS};
pub use grid::{Boundary, GridDims};
pub use render::Renderer;
pub use trail::{Mark, PointerTrail, sample_marks};
