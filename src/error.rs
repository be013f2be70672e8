use thiserror::Error;

/// Errors raised while configuring the field or exporting its state.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("invalid resolution {width}x{height}: both dimensions must be positive")]
    InvalidResolution { width: usize, height: usize },

    #[error("resolution {width}x{height} exceeds the {max_cells} cell limit")]
    ResolutionTooLarge {
        width: usize,
        height: usize,
        max_cells: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, FieldError>;
