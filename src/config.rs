//! Run configuration loaded from TOML
//!
//! Every key is optional; missing keys keep their defaults.
//!
//! ```toml
//! [directives]
//! content_label = "content"
//! opacity_range = "reject"   # reject | clamp | pass
//!
//! [export]
//! format = "pdf"             # pdf | png
//! dpi = 180
//! inkscape = "/usr/bin/inkscape"
//! keep_pages = false
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::directive::{DirectiveConfig, OpacityRange};
use crate::export::{ExportConfig, ExportFormat};

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for a complete run
#[derive(Debug, Clone, Default)]
pub struct DeckConfig {
    pub directives: DirectiveConfig,
    pub export: ExportConfig,
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    directives: TomlDirectives,
    #[serde(default)]
    export: TomlExport,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlDirectives {
    content_label: Option<String>,
    opacity_range: Option<OpacityRange>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlExport {
    format: Option<ExportFormat>,
    dpi: Option<u32>,
    inkscape: Option<PathBuf>,
    keep_pages: Option<bool>,
}

impl DeckConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(label) = parsed.directives.content_label {
            config.directives = config.directives.with_content_label(label);
        }
        if let Some(range) = parsed.directives.opacity_range {
            config.directives = config.directives.with_opacity_range(range);
        }

        let export = parsed.export;
        if let Some(format) = export.format {
            config.export = config.export.with_format(format);
        }
        if let Some(dpi) = export.dpi {
            config.export = config.export.with_dpi(dpi);
        }
        if let Some(inkscape) = export.inkscape {
            config.export = config.export.with_inkscape(inkscape);
        }
        if let Some(keep) = export.keep_pages {
            config.export = config.export.with_keep_pages(keep);
        }

        Ok(config)
    }

    /// Set the directive configuration
    pub fn with_directives(mut self, config: DirectiveConfig) -> Self {
        self.directives = config;
        self
    }

    /// Set the export configuration
    pub fn with_export(mut self, config: ExportConfig) -> Self {
        self.export = config;
        self
    }
}
