use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Runs the folio books and pages service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".folio")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_database")]
    database: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_static_dir")]
    static_dir: String,
}

fn default_database() -> String {
    "books.db".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for App {
    fn default() -> Self {
        App {
            database: default_database(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_static_dir(&self) -> &str {
        &self.static_dir
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: App,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    /// Loads the explicit path when given, otherwise the default path if it
    /// exists, otherwise the built-in defaults.
    pub fn resolve(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Config::new(path),
            None => {
                let path = default_config_path();
                if path.exists() {
                    Config::new(&path.to_string_lossy())
                } else {
                    tracing::info!(path = ?path, "no config file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        if yaml_str.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.app.get_db(), "books.db");
        assert_eq!(cfg.app.get_port(), 8000);
        assert_eq!(cfg.app.get_static_dir(), "static");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("app:\n  port: 9090\n").unwrap();
        assert_eq!(cfg.app.get_port(), 9090);
        assert_eq!(cfg.app.get_db(), "books.db");
    }

    #[test]
    fn test_empty_yaml() {
        let cfg = Config::from_yaml("").unwrap();
        assert_eq!(cfg.app.get_port(), 8000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Config::from_yaml("app:\n  port: not-a-port\n").is_err());
    }
}
