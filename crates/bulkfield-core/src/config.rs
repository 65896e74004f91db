//! Workflow configuration.
//!
//! Loaded from YAML; every field has a default so an empty file (or no file)
//! is a valid configuration.
//!
//! ```yaml
//! picker:
//!   item_kind: product
//!   allow_multiple: true
//! commit:
//!   max_concurrency: 8
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::item::ItemKind;

/// Complete workflow configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Item picker request settings.
    #[serde(default)]
    pub picker: PickerConfig,

    /// Batch commit settings.
    #[serde(default)]
    pub commit: CommitConfig,
}

/// What the picker is asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Kind of catalog entity to pick.
    #[serde(default)]
    pub item_kind: ItemKind,

    /// Whether more than one item may be picked.
    #[serde(default = "default_true")]
    pub allow_multiple: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            item_kind: ItemKind::default(),
            allow_multiple: true,
        }
    }
}

/// How per-item writes are dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitConfig {
    /// Maximum number of writes in flight at once. `1` dispatches sequentially.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
        }
    }
}

impl WorkflowConfig {
    /// Load and validate configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.commit.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "commit.max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_max_concurrency() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.picker.item_kind, ItemKind::Product);
        assert!(config.picker.allow_multiple);
        assert_eq!(config.commit.max_concurrency, 8);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(WorkflowConfig::from_yaml("").unwrap(), WorkflowConfig::default());
    }

    #[test]
    fn test_partial_yaml() {
        let config = WorkflowConfig::from_yaml(
            r#"
picker:
  item_kind: collection
commit:
  max_concurrency: 1
"#,
        )
        .unwrap();

        assert_eq!(config.picker.item_kind, ItemKind::Collection);
        assert!(config.picker.allow_multiple);
        assert_eq!(config.commit.max_concurrency, 1);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = WorkflowConfig::from_yaml("commit:\n  max_concurrency: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = WorkflowConfig::from_yaml("picker:\n  item_kind: order\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }
}
