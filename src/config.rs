use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub search: SearchSettings,
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Search index connection.
///
/// The endpoint, token and params are copied from the website's own search
/// request (browser developer tools, the POST to `.../queries`).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchSettings {
    #[validate(url)]
    pub endpoint_url: String,
    #[validate(length(min = 1))]
    pub user_token: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub extra_query_params: String,
    #[serde(default = "default_index_name")]
    #[validate(length(min = 1))]
    pub index_name: String,
    #[serde(default = "default_hits_per_page")]
    #[validate(range(min = 1, max = 1000))]
    pub hits_per_page: u32,
    #[serde(default = "default_origin")]
    pub origin: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_user_agent() -> String {
    concat!("tomato-match/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_index_name() -> String { "content_rt".to_string() }
fn default_hits_per_page() -> u32 { 100 }
fn default_origin() -> Option<String> { Some("https://www.rottentomatoes.com".to_string()) }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentSettings {
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_critics_column")]
    pub critics_column: String,
    #[serde(default = "default_audience_column")]
    pub audience_column: String,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            critics_column: default_critics_column(),
            audience_column: default_audience_column(),
        }
    }
}

fn default_request_delay_ms() -> u64 { 1000 }
fn default_critics_column() -> String { "RT".to_string() }
fn default_audience_column() -> String { "Audience Score".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    /// Extra override entries, TOML
    pub overrides_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

/// Legacy environment variables and the settings they override
const LEGACY_ENV: [(&str, &str); 4] = [
    ("RT_QUERY_URL", "search.endpoint_url"),
    ("RT_QUERY_TOKEN", "search.user_token"),
    ("RT_QUERY_AGENT", "search.user_agent"),
    ("RT_QUERY_PARAMS", "search.extra_query_params"),
];

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local configuration file (config/local.toml)
    /// 4. Environment variables (prefixed with TOMATO__)
    /// 5. Legacy RT_QUERY_* variables
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TOMATO__SEARCH__USER_TOKEN -> search.user_token
            .add_source(environment())
            .build()?;

        apply_legacy_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        apply_legacy_env(settings)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TOMATO")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the RT_QUERY_* variables on top of the loaded config
fn apply_legacy_env(settings: Config) -> Result<Config, ConfigError> {
    let overrides = LEGACY_ENV
        .iter()
        .filter_map(|(var, key)| std::env::var(var).ok().map(|value| (*key, value)));

    let mut builder = Config::builder().add_source(settings);
    for (key, value) in overrides {
        builder = builder.set_override(key, value)?;
    }

    builder.build()
}
