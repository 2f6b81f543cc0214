// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::library::recent::DEFAULT_RECENT_LIMIT;
use crate::library::viewed::VIEWED_CAPACITY;
use crate::model::Catalog;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use strum::EnumIter;

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_viewed_limit() -> usize {
    VIEWED_CAPACITY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Off => write!(f, "off"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Catalog file (`.toml` or `.json`). The built-in demo catalog is used when unset.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// UI locale ("en", "ar"). Falls back to the system locale.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub log_level: LogLevel,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_viewed_limit")]
    pub viewed_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            language: None,
            log_level: LogLevel::default(),
            // Match the serde defaults
            recent_limit: DEFAULT_RECENT_LIMIT,
            viewed_limit: VIEWED_CAPACITY,
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads the config, writing defaults on first run.
    /// Only a missing file is recovered from; syntax errors are returned.
    pub fn load_or_init(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(c) => Ok(c),
            Err(e) if Self::is_missing_config_error(&e) => {
                let config = Config::default();
                if let Err(e) = config.save(ctx) {
                    log::warn!("Could not write default config: {}", e);
                }
                Ok(config)
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        // Walk the error chain and look for an underlying IO NotFound.
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    /// Opens the configured catalog, or the built-in one when none is set.
    pub fn open_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Resolves the active UI locale: configured, then system, then English.
    pub fn effective_language(&self) -> String {
        self.language
            .clone()
            .filter(|l| !l.trim().is_empty())
            .or_else(sys_locale::get_locale)
            .map(|l| {
                // "ar-SD" / "ar_SD.UTF-8" -> "ar"
                l.split(['-', '_', '.'])
                    .next()
                    .unwrap_or("en")
                    .to_lowercase()
            })
            .filter(|l| crate::i18n::is_supported(l))
            .unwrap_or_else(|| "en".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_config_initializes_defaults() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));

        let cfg = Config::load_or_init(&ctx).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(ctx.get_config_file_path().unwrap().exists());
    }

    #[test]
    fn test_partial_file_uses_serde_defaults() {
        let ctx = TestContext::new();
        fs::write(
            ctx.get_config_file_path().unwrap(),
            "catalog = \"/srv/hymns/catalog.toml\"\nlog_level = \"debug\"\n",
        )
        .unwrap();
        let cfg = Config::load(&ctx).unwrap();
        assert_eq!(cfg.catalog, Some(PathBuf::from("/srv/hymns/catalog.toml")));
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.recent_limit, 10);
        assert_eq!(cfg.viewed_limit, 50);
    }

    #[test]
    fn test_syntax_error_is_not_treated_as_missing() {
        let ctx = TestContext::new();
        fs::write(ctx.get_config_file_path().unwrap(), "catalog = [").unwrap();
        let err = Config::load_or_init(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_roundtrip() {
        let ctx = TestContext::new();
        let cfg = Config {
            language: Some("ar".to_string()),
            recent_limit: 5,
            ..Default::default()
        };
        cfg.save(&ctx).unwrap();
        assert_eq!(Config::load(&ctx).unwrap(), cfg);
    }

    #[test]
    fn test_effective_language_prefers_config() {
        let cfg = Config {
            language: Some("ar_SD.UTF-8".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.effective_language(), "ar");

        let unsupported = Config {
            language: Some("tlh".to_string()),
            ..Default::default()
        };
        assert_eq!(unsupported.effective_language(), "en");
    }

    #[test]
    fn test_log_level_display_matches_serde() {
        use strum::IntoEnumIterator;
        for level in LogLevel::iter() {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level));
        }
    }
}
