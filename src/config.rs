use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

pub const ENV_API_URL: &str = "VTUBE_API_URL";
pub const ENV_ENVIRONMENT: &str = "VTUBE_ENV";

pub const PRODUCTION_API_URL: &str = "https://vkiri-back.fly.dev";
pub const DEVELOPMENT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL used when building absolute links. Empty means "derive
    /// from the incoming request".
    #[serde(default)]
    pub main_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            main_url: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    /// Backend base URL. When unset the environment cascade decides.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout: default_request_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VideoConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_slideshow_count")]
    pub slideshow_count: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            slideshow_count: default_slideshow_count(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub video: VideoConfig,
    /// "production" or "development"; only consulted when no explicit
    /// backend URL is given anywhere.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_per_page() -> u32 {
    20
}

fn default_slideshow_count() -> u32 {
    4
}

fn default_environment() -> String {
    "production".to_string()
}

fn normalize_url(input: &str) -> String {
    input.trim().trim_end_matches('/').to_string()
}

/// Backend URL cascade: env override, then the configured value, then the
/// built-in default for the current environment.
fn resolve_base_url(
    env_override: Option<&str>,
    configured: Option<&str>,
    development: bool,
) -> String {
    if let Some(url) = env_override.map(str::trim).filter(|u| !u.is_empty()) {
        return normalize_url(url);
    }
    if let Some(url) = configured.map(str::trim).filter(|u| !u.is_empty()) {
        return normalize_url(url);
    }
    if development {
        DEVELOPMENT_API_URL.to_string()
    } else {
        PRODUCTION_API_URL.to_string()
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        env::var(ENV_ENVIRONMENT)
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or_else(|_| self.environment.eq_ignore_ascii_case("development"))
    }

    /// Resolves the backend base URL once, at startup. The result is
    /// handed to the API client so nothing else consults the environment.
    pub fn resolved_api_base_url(&self) -> String {
        resolve_base_url(
            env::var(ENV_API_URL).ok().as_deref(),
            self.api.base_url.as_deref(),
            self.is_development(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_everything() {
        let url = resolve_base_url(
            Some("https://staging.example.net/"),
            Some("https://configured.example.net"),
            true,
        );
        assert_eq!(url, "https://staging.example.net");
    }

    #[test]
    fn configured_url_wins_over_defaults() {
        let url = resolve_base_url(None, Some(" https://configured.example.net/ "), false);
        assert_eq!(url, "https://configured.example.net");
    }

    #[test]
    fn blank_values_fall_through_the_cascade() {
        assert_eq!(
            resolve_base_url(Some("   "), Some(""), false),
            PRODUCTION_API_URL
        );
        assert_eq!(resolve_base_url(None, None, true), DEVELOPMENT_API_URL);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let config: Config = serde_yaml::from_str("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.api.request_timeout, 30);
        assert_eq!(config.video.per_page, 20);
        assert_eq!(config.video.slideshow_count, 4);
        assert_eq!(config.environment, "production");
    }
}
