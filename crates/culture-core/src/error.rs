use thiserror::Error;

/// Error type for configuration and shared infrastructure.
///
/// Component crates define their own error enums; this one covers the
/// concerns that live in `culture-core` itself.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid coordinates: lat={lat}, lng={lng}")]
    InvalidCoordinates { lat: f64, lng: f64 },
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}


/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, CoreError>;
