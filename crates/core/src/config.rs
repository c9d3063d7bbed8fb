//! Start-up configuration, read from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration. Unknown
//! fields are rejected to catch typos.

use crate::error::SwatchError;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Id of the canvas element the scene draws into.
pub const DEFAULT_CANVAS_ID: &str = "glCanvas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// DOM id of the drawing surface.
    pub canvas_id: String,
    /// Redraw after every resize. When `false` a resized surface keeps
    /// whatever the host left in it until the next color change.
    pub redraw_on_resize: bool,
    /// Maximum log level ("off", "error", "warn", "info", "debug", "trace").
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            redraw_on_resize: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON configuration object.
    ///
    /// # Errors
    ///
    /// `SwatchError::Config` on malformed JSON, unknown fields, an empty
    /// canvas id, or an unrecognized log level.
    pub fn from_json(json: &str) -> Result<Self, SwatchError> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| SwatchError::Config(e.to_string()))?;
        if config.canvas_id.is_empty() {
            return Err(SwatchError::Config("canvas_id must not be empty".into()));
        }
        config.log_level_filter()?;
        Ok(config)
    }

    /// The configured log level as a `log` filter.
    pub fn log_level_filter(&self) -> Result<LevelFilter, SwatchError> {
        self.log_level
            .parse()
            .map_err(|_| SwatchError::Config(format!("unknown log level '{}'", self.log_level)))
    }
}
