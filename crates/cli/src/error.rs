//! Errors from `swatch render` and `swatch list`, each with its own exit
//! code. Clap exits with 2 on bad arguments before any of these occur.

use std::fmt;
use swatch_core::SwatchError;

#[derive(Debug)]
pub enum CliError {
    /// Shader build or geometry upload failed on the software backend.
    /// Exit code 10.
    Scene(SwatchError),
    /// The PNG could not be encoded or written. Exit code 11.
    Io(String),
    /// Unknown `--press` control or a surface size that cannot be
    /// allocated. Exit code 12.
    Input(String),
    /// `--json` output could not be produced. Exit code 13.
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Scene(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Scene(e) => write!(f, "scene setup failed: {e}"),
            CliError::Io(msg) => write!(f, "cannot write snapshot: {msg}"),
            CliError::Input(msg) | CliError::Serialization(msg) => f.write_str(msg),
        }
    }
}

impl From<SwatchError> for CliError {
    fn from(e: SwatchError) -> Self {
        CliError::Scene(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<image::ImageError> for CliError {
    fn from(e: image::ImageError) -> Self {
        CliError::Io(e.to_string())
    }
}
