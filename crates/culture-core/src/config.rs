use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::Coordinates;

/// Top-level configuration for CultureGuide.
///
/// Loaded from `~/.culture/config.toml` (or `$CULTURE_CONFIG`) by default. API keys are never
/// stored here: each remote collaborator names the environment variable that
/// holds its credential, resolved at runtime by `credential()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub map: MapConfig,
}

impl GuideConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GuideConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Geolocation request options and the fallback reference point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    /// Acquisition deadline; expiry settles as `TimedOut`.
    pub timeout_ms: u64,
    /// Maximum age of a cached platform reading.
    pub max_age_ms: u64,
    pub default_lat: f64,
    pub default_lng: f64,
}

impl LocationConfig {
    pub fn default_coordinates(&self) -> Coordinates {
        let coords = Coordinates::new(self.default_lat, self.default_lng);
        if coords.is_valid() {
            coords
        } else {
            warn!(
                lat = self.default_lat,
                lng = self.default_lng,
                "Configured default location is invalid, using built-in reference point"
            );
            Coordinates::DEFAULT
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 15_000,
            max_age_ms: 60_000,
            default_lat: Coordinates::DEFAULT.lat,
            default_lng: Coordinates::DEFAULT.lng,
        }
    }
}

/// Remote chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer credential.
    pub api_key_env: String,
    pub timeout_secs: u64,
    /// `HTTP-Referer` attribution header (OpenRouter).
    pub http_referer: Option<String>,
    /// `X-Title` attribution header (OpenRouter).
    pub x_title: Option<String>,
}

impl ModelConfig {
    /// Resolve the credential from the process environment.
    pub fn credential(&self) -> Option<String> {
        credential_from(&self.api_key_env, |name| std::env::var(name).ok())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-oss-120b:free".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 120,
            http_referer: None,
            x_title: Some("CultureGuide".to_string()),
        }
    }
}

/// Remote places-search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacesConfig {
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl PlacesConfig {
    pub fn credential(&self) -> Option<String> {
        credential_from(&self.api_key_env, |name| std::env::var(name).ok())
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://google.serper.dev/places".to_string(),
            api_key_env: "SERPER_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Conversation limits and placeholder text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Inputs longer than this many characters are rejected.
    pub max_message_length: usize,
    /// Content of the pending assistant message.
    pub placeholder: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            placeholder: "Thinking…".to_string(),
        }
    }
}

/// Map view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_zoom: u8,
    /// Zoom applied when focusing a single point.
    pub focus_zoom: u8,
    /// Prefix of the external directions URL; `/{origin}/{dest}` is appended.
    pub directions_base_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_zoom: 11,
            focus_zoom: 16,
            directions_base_url: "https://www.google.com/maps/dir".to_string(),
        }
    }
}

/// Look up a credential by variable name; blank values count as absent.
pub fn credential_from<F>(var_name: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if var_name.trim().is_empty() {
        return None;
    }
    lookup(var_name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
