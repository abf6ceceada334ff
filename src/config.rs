use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_format: OutputFormat,
    pub base_url: String,
    pub timeouts: Timeouts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub request: Duration,
    #[serde(with = "humantime_serde")]
    pub download: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            download: Duration::from_secs(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Yaml,
            base_url: "https://api.figma.com".to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. Missing fields fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, std::io::Error> {
        let contents = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("base_url must start with http:// or https://".to_string());
        }
        if self.timeouts.request.is_zero() || self.timeouts.download.is_zero() {
            return Err("timeouts must be greater than zero seconds".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.output_format, OutputFormat::Yaml);
        assert_eq!(cfg.base_url, "https://api.figma.com");
        assert_eq!(cfg.timeouts.request, Duration::from_secs(30));
        assert_eq!(cfg.timeouts.download, Duration::from_secs(30));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_base_url_and_zero_timeouts() {
        let mut cfg = Config::default();
        cfg.base_url = "api.figma.com".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.timeouts.request = Duration::from_secs(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_from_toml_applies_defaults() {
        let tmp = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        std::fs::write(
            tmp.path(),
            r#"
output_format = "json"
[timeouts]
request = "20s"
"#,
        )
        .unwrap();

        let cfg = Config::from_toml_file(tmp.path()).expect("load config");
        assert_eq!(cfg.output_format, OutputFormat::Json);
        assert_eq!(cfg.base_url, "https://api.figma.com");
        assert_eq!(cfg.timeouts.request, Duration::from_secs(20));
        assert_eq!(cfg.timeouts.download, Duration::from_secs(30));
    }
}
