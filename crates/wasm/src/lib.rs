#![deny(unsafe_code)]
//! WASM bindings for swatch.
//!
//! `start()` (or `startWithConfig(json)`) finds the canvas, creates a
//! WebGL context, brings up the [`App`](swatch_core::App) and wires the
//! window resize event and the four color buttons to it. Start-up failures
//! are reported once, to the console and as an alert.

#[cfg(target_arch = "wasm32")]
mod logger;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{start, start_with_config};
