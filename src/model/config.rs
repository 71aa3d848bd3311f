use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

const ENV_CONFIG_PATH: &str = "LISTING_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600; // 1 hour

/// Supported marketplace source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Marketplace hosts accepted for analysis (subdomains included)
    #[serde(default = "SourceConfig::default_hosts")]
    pub hosts: Vec<String>,
    /// Substring a listing URL path must contain
    #[serde(default = "SourceConfig::default_listing_path_pattern")]
    pub listing_path_pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            hosts: Self::default_hosts(),
            listing_path_pattern: Self::default_listing_path_pattern(),
        }
    }
}

impl SourceConfig {
    fn default_hosts() -> Vec<String> {
        vec!["kijiji.ca".to_string()]
    }

    fn default_listing_path_pattern() -> String {
        "/v-".to_string()
    }

    /// Check whether a URL points at a supported marketplace host
    pub fn is_supported_host(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        self.hosts.iter().any(|h| {
            let h = h.to_lowercase();
            host == h || host.ends_with(&format!(".{}", h))
        })
    }

    /// Check whether a URL path matches the listing pattern
    pub fn is_listing_path(&self, url: &Url) -> bool {
        url.path().contains(&self.listing_path_pattern)
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub sources: SourceConfig,
    pub cache_ttl_seconds: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: SourceConfig,
    pub cache_ttl_seconds: u64,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self {
            sources: file.sources,
            cache_ttl_seconds: file.cache_ttl_seconds.unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_host_includes_subdomains() {
        let sources = SourceConfig::default();

        let listing = Url::parse("https://www.kijiji.ca/v-bikes/city/road-bike/123").unwrap();
        assert!(sources.is_supported_host(&listing));
        assert!(sources.is_listing_path(&listing));

        let wrong_host = Url::parse("https://www.craigslist.org/v-bikes/123").unwrap();
        assert!(!sources.is_supported_host(&wrong_host));

        // Suffix must match on a label boundary
        let lookalike = Url::parse("https://notkijiji.ca/v-bikes/123").unwrap();
        assert!(!sources.is_supported_host(&lookalike));
    }

    #[test]
    fn non_listing_path_rejected() {
        let sources = SourceConfig::default();
        let browse = Url::parse("https://www.kijiji.ca/b-bikes/canada/c644").unwrap();
        assert!(!sources.is_listing_path(&browse));
    }
}
