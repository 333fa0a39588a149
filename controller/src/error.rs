use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating [`crate::settings::ControllerSettings`].
///
/// Sensing and locomotion never fail; configuration is the only fallible surface.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings")]
    Parse(#[from] toml::de::Error),

    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be finite")]
    NotFinite { field: &'static str },
}
