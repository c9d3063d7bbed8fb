//! GPU rendering through `glow`.
//!
//! This module is only available when the `render` feature is enabled.
//! It provides [`GpuContext`], the [`GlBackend`](crate::backend::GlBackend)
//! used in the browser.

pub mod context;

pub use context::GpuContext;
