//! Runtime configuration injected into the sources at construction.
//!
//! The only secret is the weather key. A missing key is not a construction
//! error: the weather screen reports it the first time it tries to fetch.

use tracing::debug;

use crate::source::base;

pub const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const BASE_URL_VAR: &str = "SCREENS_BASE_URL";

/// Base URL of every provider, without trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub genderize: String,
    pub agify: String,
    pub universities: String,
    pub weather: String,
    pub pokeapi: String,
    pub blog: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            genderize: "https://api.genderize.io".into(),
            agify: "https://api.agify.io".into(),
            // HTTPS proxy in front of the universities directory.
            universities: "https://adamix.net".into(),
            weather: "https://api.weatherapi.com".into(),
            pokeapi: "https://pokeapi.co".into(),
            blog: "https://kinsta.com".into(),
        }
    }
}

impl Endpoints {
    /// Every provider mounted under one host, one path prefix each. This is
    /// the layout served by the mock server.
    pub fn mirrored(base_url: &str) -> Self {
        let root = base(base_url);
        Self {
            genderize: format!("{root}/genderize"),
            agify: format!("{root}/agify"),
            universities: format!("{root}/universities"),
            weather: format!("{root}/weatherapi"),
            pokeapi: format!("{root}/pokeapi"),
            blog: format!("{root}/blog"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoints: Endpoints,
    pub weather_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same rules as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let endpoints = match non_empty(BASE_URL_VAR) {
            Some(root) => {
                debug!(%root, "using mirrored endpoints");
                Endpoints::mirrored(&root)
            }
            None => Endpoints::default(),
        };

        let weather_api_key = non_empty(WEATHER_API_KEY_VAR);
        if weather_api_key.is_none() {
            debug!("{WEATHER_API_KEY_VAR} not set; weather screen will report it on first fetch");
        }

        Self {
            endpoints,
            weather_api_key,
        }
    }

    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = Some(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_production_providers() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.endpoints, Endpoints::default());
        assert_eq!(config.endpoints.genderize, "https://api.genderize.io");
        assert!(config.weather_api_key.is_none());
    }

    #[test]
    fn reads_weather_key() {
        let config = Config::from_lookup(lookup(&[(WEATHER_API_KEY_VAR, "abc123")]));
        assert_eq!(config.weather_api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn blank_weather_key_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[(WEATHER_API_KEY_VAR, "   ")]));
        assert!(config.weather_api_key.is_none());
    }

    #[test]
    fn base_url_switches_to_mirrored_layout() {
        let config = Config::from_lookup(lookup(&[(BASE_URL_VAR, "http://127.0.0.1:3000/")]));
        assert_eq!(config.endpoints.genderize, "http://127.0.0.1:3000/genderize");
        assert_eq!(config.endpoints.weather, "http://127.0.0.1:3000/weatherapi");
        assert_eq!(config.endpoints.blog, "http://127.0.0.1:3000/blog");
    }
}
