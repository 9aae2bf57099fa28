use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::PantryError;
use crate::ingredients::matcher::{threshold_in_range, MATCH_THRESHOLD};
use crate::shopping::WHOLE_FOODS_SEARCH;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct PantryConfig {
    /// Where the pantry is persisted
    #[serde(default)]
    pub store: StoreConfig,
    /// Ingredient matching settings
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Shopping link settings
    #[serde(default)]
    pub shopping: ShoppingConfig,
    /// Photo analysis settings
    #[serde(default)]
    pub vision: VisionConfig,
}

/// Configuration for the pantry file
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Path of the JSON document holding the pantry and shopping list
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Configuration for the ingredient matcher
#[derive(Debug, Deserialize, Clone)]
pub struct MatchingConfig {
    /// Minimum fuzzy score (0-100, inclusive) accepted as a match
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

/// Configuration for purchase links
#[derive(Debug, Deserialize, Clone)]
pub struct ShoppingConfig {
    /// Search URL with a `{query}` placeholder
    #[serde(default = "default_search_url_template")]
    pub search_url_template: String,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            search_url_template: default_search_url_template(),
        }
    }
}

/// Configuration for the Gemini vision client
#[derive(Debug, Deserialize, Clone)]
pub struct VisionConfig {
    /// API key (can also be set via the GEMINI_API_KEY environment variable)
    pub api_key: Option<String>,
    /// Model identifier (e.g., "gemini-2.5-flash")
    #[serde(default = "default_vision_model")]
    pub model: String,
    /// Base URL for the API endpoint (for proxies and tests)
    #[serde(default = "default_vision_base_url")]
    pub base_url: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_vision_model(),
            base_url: default_vision_base_url(),
            temperature: default_temperature(),
            timeout: default_timeout(),
        }
    }
}

impl VisionConfig {
    /// API key from the config, falling back to `GEMINI_API_KEY`.
    /// Blank keys count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), std::env::var("GEMINI_API_KEY").ok())
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    let usable = |key: &str| !key.trim().is_empty();
    configured
        .filter(|key| usable(key))
        .map(str::to_string)
        .or_else(|| from_env.filter(|key| usable(key)))
}

impl MatchingConfig {
    /// The configured threshold, rejected unless it lies within 0-100
    pub fn validated_threshold(&self) -> Result<f64, PantryError> {
        if threshold_in_range(self.threshold) {
            Ok(self.threshold)
        } else {
            Err(PantryError::ConfigError(ConfigError::Message(format!(
                "matching.threshold must be between 0 and 100, got {}",
                self.threshold
            ))))
        }
    }
}

// Default value functions
fn default_store_path() -> String {
    "pantry.json".to_string()
}

fn default_threshold() -> f64 {
    MATCH_THRESHOLD
}

fn default_search_url_template() -> String {
    WHOLE_FOODS_SEARCH.to_string()
}

fn default_vision_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_vision_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    30
}

impl PantryConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. pantry.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__VISION__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`PantryConfig::load`] for the precedence rules.
pub fn load_config() -> Result<PantryConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("pantry").required(false))
        // Use double underscore for nested: PANTRY__MATCHING__THRESHOLD
        .add_source(
            Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(default_store_path(), "pantry.json");
        assert_eq!(default_threshold(), 70.0);
        assert_eq!(default_vision_model(), "gemini-2.5-flash");
        assert_eq!(default_timeout(), 30);
        assert!(default_search_url_template().contains("{query}"));
    }

    #[test]
    fn test_pantry_config_default() {
        let config = PantryConfig::default();
        assert_eq!(config.store.path, "pantry.json");
        assert_eq!(config.matching.threshold, 70.0);
        assert!(config.vision.api_key.is_none());
        assert_eq!(
            config.vision.base_url,
            "https://generativelanguage.googleapis.com"
        );
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = VisionConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.resolved_api_key().is_none());
    }

    #[test]
    fn test_blank_configured_key_falls_back_to_env() {
        assert_eq!(
            resolve_api_key(Some(""), Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve_api_key(Some("  "), Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            resolve_api_key(Some("from-config"), Some("from-env".to_string())).as_deref(),
            Some("from-config")
        );
        assert!(resolve_api_key(None, Some(" ".to_string())).is_none());
        assert!(resolve_api_key(None, None).is_none());
    }

    #[test]
    fn test_threshold_validation() {
        let valid = MatchingConfig { threshold: 85.0 };
        assert_eq!(valid.validated_threshold().unwrap(), 85.0);
        assert_eq!(MatchingConfig { threshold: 0.0 }.validated_threshold().unwrap(), 0.0);
        assert_eq!(MatchingConfig { threshold: 100.0 }.validated_threshold().unwrap(), 100.0);

        for threshold in [-0.5, 100.1, f64::NAN] {
            let result = MatchingConfig { threshold }.validated_threshold();
            assert!(matches!(result, Err(PantryError::ConfigError(_))));
        }
    }

    #[test]
    fn test_configured_api_key_wins() {
        let config = VisionConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("from-config"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings = Config::builder()
            .add_source(File::from_str(
                "[matching]\nthreshold = 85.0\n\n[vision]\nmodel = \"gemini-2.0-flash\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: PantryConfig = settings.try_deserialize().unwrap();
        assert_eq!(config.matching.threshold, 85.0);
        assert_eq!(config.vision.model, "gemini-2.0-flash");
        assert_eq!(config.vision.timeout, 30);
        assert_eq!(config.store.path, "pantry.json");
    }

    #[test]
    fn test_load_config_without_file() {
        // Every field is defaulted, so a bare environment still loads
        let config = load_config().unwrap();
        assert!(config.matching.threshold > 0.0);
    }
}
