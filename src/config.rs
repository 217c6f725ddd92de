use std::{env, fmt::Display, str::FromStr};

use axum::http::HeaderValue;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::events::DEFAULT_CAPACITY;

const DEVELOPMENT_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:5173"];
const PRODUCTION_ORIGINS: &[&str] = &["https://your-vercel-app.vercel.app"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub allowed_origins: Vec<HeaderValue>,
    pub broadcast_capacity: usize,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            info!("Loaded .env file");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            Some(value) if value.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        };

        let origins: Vec<String> = match lookup("ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => environment
                .default_origins()
                .iter()
                .map(|o| o.to_string())
                .collect(),
        };
        let allowed_origins = origins
            .into_iter()
            .map(|origin| {
                // credentials are allowed, which CORS forbids for a wildcard origin
                if origin == "*" {
                    return Err(ConfigError::InvalidValue {
                        key: "ALLOWED_ORIGINS",
                        value: origin,
                        reason: "wildcard origin cannot be used with credentials".to_string(),
                    });
                }
                HeaderValue::from_str(&origin).map_err(|e| ConfigError::InvalidValue {
                    key: "ALLOWED_ORIGINS",
                    value: origin.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let broadcast_capacity: usize =
            try_load(&lookup, "BROADCAST_CAPACITY", DEFAULT_CAPACITY)?;
        if broadcast_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "BROADCAST_CAPACITY",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "PORT", 3000)?,
            environment,
            allowed_origins,
            broadcast_capacity,
        })
    }
}

impl Environment {
    fn default_origins(self) -> &'static [&'static str] {
        match self {
            Environment::Development => DEVELOPMENT_ORIGINS,
            Environment::Production => PRODUCTION_ORIGINS,
        }
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key,
                value: value.clone(),
                reason: e.to_string(),
            }
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.broadcast_capacity, DEFAULT_CAPACITY);
        assert_eq!(config.allowed_origins.len(), DEVELOPMENT_ORIGINS.len());
    }

    #[test]
    fn test_production_origins() {
        let config = config_from(&[("NODE_ENV", "production"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            config.allowed_origins,
            vec![HeaderValue::from_static(PRODUCTION_ORIGINS[0])]
        );
    }

    #[test]
    fn test_origin_override() {
        let config = config_from(&[(
            "ALLOWED_ORIGINS",
            "https://a.example, https://b.example,",
        )])
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec![
                HeaderValue::from_static("https://a.example"),
                HeaderValue::from_static("https://b.example"),
            ]
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("BROADCAST_CAPACITY", "0")]).is_err());
        assert!(config_from(&[("ALLOWED_ORIGINS", "*")]).is_err());
    }
}
