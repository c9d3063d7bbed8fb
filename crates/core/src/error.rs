//! Error types for swatch.

use crate::shader::ShaderError;
use thiserror::Error;

/// Errors produced while bringing up or driving the scene.
///
/// Every variant is fatal for the session: there is no retry or fallback
/// path, the caller reports the error once and stops.
#[derive(Debug, Error)]
pub enum SwatchError {
    /// The host could not provide a rendering context.
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),

    /// The shader program failed to compile or link.
    #[error(transparent)]
    Shader(#[from] ShaderError),

    /// The backend could not allocate the vertex buffer.
    #[error("vertex buffer allocation failed: {0}")]
    Buffer(String),

    /// The linked program does not expose the named vertex attribute.
    #[error("vertex attribute not found: {0}")]
    AttributeMissing(String),

    /// The linked program does not expose the named uniform.
    #[error("uniform not found: {0}")]
    UniformMissing(String),

    /// A framebuffer was requested with a zero side or more pixels than
    /// the software backend will allocate.
    #[error("invalid dimensions: width {width}, height {height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
