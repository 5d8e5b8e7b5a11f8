use crate::utils::error::{PiggyError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_FILE: &str = "piggybank.json";
pub const DEFAULT_CONFIG_FILE: &str = "piggybank.toml";

/// Optional TOML configuration file. Everything in it can also be given on
/// the command line; flags win.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub data_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| PiggyError::ConfigError {
            message: format!("invalid config file {}: {}", path.display(), e),
        })
    }
}

/// Resolve the data-file location from, in order of precedence: the
/// `--data-file` flag, the config file, the built-in default.
pub fn resolve_data_file(flag: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }

    let (path, required) = match config_path {
        Some(p) => (p, true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if path.exists() {
        let config = FileConfig::load(&path)?;
        if let Some(data_file) = config.data_file {
            return Ok(data_file);
        }
    } else if required {
        return Err(PiggyError::ConfigError {
            message: format!("config file not found: {}", path.display()),
        });
    }

    Ok(PathBuf::from(DEFAULT_DATA_FILE))
}
