//! Error types for scene setup and rendering.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid camera configuration: {0}")]
    InvalidConfig(String),

    #[error("Image buffer has {actual} pixels, expected {width}x{height}")]
    BufferSize { width: u32, height: u32, actual: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;
