//! Configuration for directive parsing

use serde::Deserialize;

/// What to do with an opacity outside `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpacityRange {
    /// Fail with an out-of-range error
    #[default]
    Reject,
    /// Clamp into `[0, 1]`
    Clamp,
    /// Hand the value to the renderer unchanged
    Pass,
}

/// Configuration options for reading slide directives
#[derive(Debug, Clone)]
pub struct DirectiveConfig {
    /// Label of the layer holding the directive text (matched case-insensitively)
    pub content_label: String,

    /// Handling of opacities outside `[0, 1]`
    pub opacity_range: OpacityRange,
}

impl Default for DirectiveConfig {
    fn default() -> Self {
        Self {
            content_label: "content".to_string(),
            opacity_range: OpacityRange::Reject,
        }
    }
}

impl DirectiveConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label of the content layer
    pub fn with_content_label(mut self, label: impl Into<String>) -> Self {
        self.content_label = label.into();
        self
    }

    /// Set the opacity range policy
    pub fn with_opacity_range(mut self, range: OpacityRange) -> Self {
        self.opacity_range = range;
        self
    }
}
