//! # Pool Configuration
//!
//! Tunables for the pool manager. Configuration can be built in code with the
//! `with_*` builder methods or loaded from a TOML or RON file; the format is
//! picked from the file extension.
//!
//! ```toml
//! persistent_instances = true
//!
//! [strict]
//! reject_double_despawn = true
//! reject_stale_handles = false
//! reject_template_despawn = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Supported on-disk configuration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Opt-in hard errors for misuse the pool otherwise tolerates
///
/// Every option defaults to `false`, which keeps the lenient behavior: the
/// misuse is logged and the operation carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrictnessConfig {
    /// Despawning a handle that is already queued returns
    /// [`PoolError::DoubleDespawn`](crate::PoolError::DoubleDespawn) instead of
    /// queueing it a second time.
    pub reject_double_despawn: bool,

    /// Dequeuing a handle the host already destroyed returns
    /// [`PoolError::StaleHandle`](crate::PoolError::StaleHandle) instead of
    /// skipping it. Despawning a dead handle returns
    /// [`PoolError::DeadHandle`](crate::PoolError::DeadHandle) instead of
    /// being ignored.
    pub reject_stale_handles: bool,

    /// Despawning a pool's template object returns
    /// [`PoolError::TemplateDespawn`](crate::PoolError::TemplateDespawn)
    /// instead of being ignored.
    pub reject_template_despawn: bool,
}

impl StrictnessConfig {
    /// Every misuse check turned into an error
    pub fn strict() -> Self {
        Self {
            reject_double_despawn: true,
            reject_stale_handles: true,
            reject_template_despawn: true,
        }
    }
}

/// # Pool Manager Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Instances created by the pool survive scene loads
    pub persistent_instances: bool,

    /// Upper bound for a single `prewarm` call
    pub max_prewarm: usize,

    /// Misuse handling
    pub strict: StrictnessConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            persistent_instances: true,
            max_prewarm: 4096,
            strict: StrictnessConfig::default(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether created instances survive scene loads
    pub fn with_persistent_instances(mut self, persistent: bool) -> Self {
        self.persistent_instances = persistent;
        self
    }

    /// Set misuse handling
    pub fn with_strictness(mut self, strict: StrictnessConfig) -> Self {
        self.strict = strict;
        self
    }

    /// Set the per-call prewarm limit
    pub fn with_max_prewarm(mut self, max_prewarm: usize) -> Self {
        self.max_prewarm = max_prewarm;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_prewarm == 0 {
            return Err(ConfigError::Invalid("max_prewarm must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Load configuration from a `.toml` or `.ron` file and validate it
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Toml => {
                toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
            ConfigFormat::Ron => {
                ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
            }
        };

        config.validate()?;
        log::debug!("Loaded pool configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.ron` file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}
