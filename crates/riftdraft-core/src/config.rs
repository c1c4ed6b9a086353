// Configuration loading and parsing (config/riftdraft.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the single config file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "riftdraft.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Data-dragon CDN root used to build icon URLs.
    #[serde(default = "default_icon_cdn")]
    pub icon_cdn: String,
    /// Version used when the catalog does not report one.
    #[serde(default = "default_fallback_version")]
    pub fallback_version: String,
    /// Reject assignments of names missing from the fetched catalog.
    #[serde(default = "default_true")]
    pub validate_names: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            icon_cdn: default_icon_cdn(),
            fallback_version: default_fallback_version(),
            validate_names: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            log_dir: default_log_dir(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_icon_cdn() -> String {
    "https://ddragon.leagueoflegends.com/cdn".to_string()
}

fn default_fallback_version() -> String {
    "15.5.1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "riftdraft_core=info,riftdraft_cli=info,warn".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/riftdraft.toml` relative to `base_dir`.
///
/// Does not seed defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config = parse_config(&text).map_err(|source| ConfigError::ParseError {
        path: path.clone(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Seed `config/riftdraft.toml` from `defaults/riftdraft.toml` when it is
/// missing. Returns the path written, or `None` when a config already exists.
/// An existing config is never overwritten.
pub fn seed_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    let content = std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "no config at {} and cannot read {}: {e}",
            target.display(),
            source.display()
        ),
    })?;

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }

    // A config created since the exists() check wins.
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;
    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding
/// it from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = config.backend.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: format!("must be an http(s) URL, got {url:?}"),
        });
    }

    if config.backend.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "backend.request_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.catalog.fallback_version.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "catalog.fallback_version".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
