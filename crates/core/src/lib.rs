#![deny(unsafe_code)]
//! Core of swatch: a flat-colored rectangle drawn through a small GL
//! capability trait.
//!
//! Provides the [`GlBackend`] trait, the shader builder, the fixed quad
//! geometry, the scene renderer, the [`App`] state object with its color
//! controller, the four [`Control`]s, [`AppConfig`], start-up failure
//! reporting, and a CPU [`SoftwareBackend`]. The `render` feature adds [`render::GpuContext`],
//! a `glow` implementation of the backend.

pub mod app;
pub mod backend;
pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod report;
pub mod scene;
pub mod shader;
pub mod software;
pub mod viewport;

#[cfg(feature = "render")]
pub mod render;

#[cfg(test)]
mod testing;

pub use app::App;
pub use backend::{GlBackend, ShaderStage};
pub use color::Rgba;
pub use config::AppConfig;
pub use controls::Control;
pub use error::SwatchError;
pub use report::{report_failure, Reporter};
pub use shader::ShaderError;
pub use software::SoftwareBackend;
pub use viewport::{Surface, Viewport};
