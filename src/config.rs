//! Optional project-local configuration.
//!
//! CLI flags are the primary configuration source; a `langfront.toml` file
//! in the current directory may override the defaults below, and its
//! absence is never an error. Every field is independently defaulted so a
//! partial file (or no file at all) always produces a usable `Config`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CompileError;

/// Settings a config file may override. CLI flags, applied afterward by
/// the binary, always win over whatever is loaded here.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub color: bool,
    pub verbosity: Verbosity,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            color: true,
            verbosity: Verbosity::Warn,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Warn,
    Info,
    Debug,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Warn
    }
}

impl Verbosity {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Verbosity::Warn => log::LevelFilter::Warn,
            Verbosity::Info => log::LevelFilter::Info,
            Verbosity::Debug => log::LevelFilter::Debug,
        }
    }
}

impl Config {
    /// Loads `langfront.toml` from `dir` if it exists, else returns the
    /// default configuration. A present-but-malformed file is a usage
    /// error; a missing file is not.
    pub fn load(dir: &Path) -> Result<Config, CompileError> {
        let path = dir.join("langfront.toml");
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path).map_err(|source| CompileError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&text).map_err(|e| CompileError::Usage(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = std::env::temp_dir().join("langfront-config-test-missing");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let config = Config::load(&dir).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = std::env::temp_dir().join("langfront-config-test-partial");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("langfront.toml"), "verbosity = \"debug\"\n").unwrap();
        let config = Config::load(&dir).unwrap();
        assert_eq!(config.verbosity, Verbosity::Debug);
        assert!(config.color);
    }

    #[test]
    fn malformed_file_is_a_usage_error() {
        let dir = std::env::temp_dir().join("langfront-config-test-malformed");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("langfront.toml"), "not valid toml =====").unwrap();
        assert!(matches!(Config::load(&dir), Err(CompileError::Usage(_))));
    }
}
