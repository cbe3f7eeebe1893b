//! Shared domain types, context channels, and configuration for CultureGuide.

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::GuideConfig;
pub use context::ContextReader;
pub use error::{CoreError, Result};
pub use types::*;
