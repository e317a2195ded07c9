use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Seed data (built-in school dataset when unset)
    pub seed_file: Option<PathBuf>,

    // Logging
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(port) => port
                    .parse()
                    .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?,
                Err(_) => 8000,
            },

            // Seed data
            seed_file: std::env::var("SEED_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),

            // Logging
            log_filter: std::env::var("LOG_FILTER")
                .unwrap_or_else(|_| "activity_signup=info".to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = ["HOST", "PORT", "SEED_FILE", "LOG_FILTER"];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = Config::from_env().expect("defaults should load");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert!(config.seed_file.is_none());
        assert_eq!(config.log_filter, "activity_signup=info");
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("HOST", "127.0.0.1");
        std::env::set_var("PORT", "9090");
        std::env::set_var("SEED_FILE", "/etc/activities.json");
        std::env::set_var("LOG_FILTER", "activity_signup=debug");

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(config.seed_file, Some(PathBuf::from("/etc/activities.json")));
        assert_eq!(config.log_filter, "activity_signup=debug");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        clear_env();
        std::env::set_var("PORT", "eighty");

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid port number"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_blank_seed_file_is_ignored() {
        clear_env();
        std::env::set_var("SEED_FILE", "  ");

        assert!(Config::from_env().unwrap().seed_file.is_none());

        clear_env();
    }
}
