//! CLI argument definitions for the `culture` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand, ValueEnum};
use culture_chat::OrchestratorOptions;
use culture_core::Coordinates;
use std::path::PathBuf;

/// CultureGuide: discover cultural places nearby and ask about them.
#[derive(Parser, Debug)]
#[command(name = "culture", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Latitude reported by the position source.
    #[arg(long, requires = "lng", allow_negative_numbers = true, global = true)]
    pub lat: Option<f64>,

    /// Longitude reported by the position source.
    #[arg(long, requires = "lat", allow_negative_numbers = true, global = true)]
    pub lng: Option<f64>,

    /// Behave as if the platform had no location capability.
    #[arg(long = "no-geolocation", conflicts_with_all = ["lat", "lng"], global = true)]
    pub no_geolocation: bool,

    /// Conversation surface to use.
    #[arg(short = 'p', long, value_enum, default_value_t = Preset::Guide, global = true)]
    pub preset: Preset,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Guide,
    Companion,
}

impl Preset {
    pub fn options(self) -> OrchestratorOptions {
        match self {
            Preset::Guide => OrchestratorOptions::guide(),
            Preset::Companion => OrchestratorOptions::companion(),
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Ask the guide a question.
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Send one of the canned quick replies (0-based index).
    Quick { index: usize },
    /// List the points of interest around the current position.
    Nearby,
    /// Search for places and replace the catalog with the results.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Category hint, or "all".
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Ask the guide about a point of interest by id.
    AskAbout { id: String },
    /// Print the directions link for a point of interest by id.
    Directions { id: String },
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > CULTURE_CONFIG env var > ~/.culture/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(|key| std::env::var(key).ok())
    }

    fn resolve_config_path_with<F>(&self, lookup: F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = lookup("CULTURE_CONFIG").filter(|p| !p.trim().is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path(lookup("HOME"))
    }

    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// Coordinates the position source should report, if any.
    pub fn fixed_position(&self) -> Option<Coordinates> {
        if self.no_geolocation {
            return None;
        }
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

/// Default config file path.
fn default_config_path(home: Option<String>) -> PathBuf {
    match home {
        Some(home) => PathBuf::from(home).join(".culture").join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}
