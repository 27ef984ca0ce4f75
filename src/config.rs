use crate::error::{Result, XrefError};
use crate::writer::OutputEncoding;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_CANDIDATES: [&str; 2] = ["impxref.config.json", "config/impxref.config.json"];

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_output_name")]
    pub output_name: String,

    #[serde(default)]
    pub output_encoding: OutputEncoding,

    /// Replaces the desktop as the output directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub skip_key_header: bool,
}

fn default_output_name() -> String {
    "Product_Descriptions.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_name: default_output_name(),
            output_encoding: OutputEncoding::Utf16,
            output_dir: None,
            skip_key_header: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .map_err(|e| XrefError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| XrefError::Config(format!("invalid config JSON in {}: {}", path.display(), e)))
    }

    /// Explicit path first, then the default locations, then built-in defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Config::from_file(path);
        }
        for candidate in &CONFIG_CANDIDATES {
            let path = Path::new(candidate);
            if path.is_file() {
                return Config::from_file(path);
            }
        }
        Ok(Config::default())
    }
}
