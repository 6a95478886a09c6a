//! Error type for the rasterizer.

use jrtr_core::{SceneError, VertexDataError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("material '{material}' is textured but has no texture bound")]
    MissingTexture { material: String },

    #[error("shape '{shape}' uses a textured material but has no texture coordinates")]
    MissingTexCoords { shape: String },

    #[error("invalid vertex data: {0}")]
    VertexData(#[from] VertexDataError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("triangle submitted outside begin_frame/end_frame")]
    FrameNotStarted,
}

pub type RenderResult<T> = Result<T, RenderError>;
