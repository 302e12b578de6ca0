//! `cvtool` configuration, loaded with the `config` crate.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cv_sync::{DEFAULT_STRIP_KEYS, StripKeys};
use serde::Deserialize;

/// Runtime configuration, layered from `cvtool.toml` and `CVTOOL_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
  /// SQLite file backing `import`, `export`, `list` and `delete`.
  pub store_path:   PathBuf,
  /// Keys ignored when fingerprinting.
  pub strip_keys:   Vec<String>,
  /// Store key used when `--key` is not given.
  pub document_key: String,
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      store_path:   PathBuf::from("cvtool.db"),
      strip_keys:   DEFAULT_STRIP_KEYS.iter().map(|k| k.to_string()).collect(),
      document_key: "cv".to_string(),
    }
  }
}

impl ToolConfig {
  /// Load from an optional TOML file, then override from the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("CVTOOL")
          .list_separator(",")
          .with_list_parse_key("strip_keys")
          .try_parsing(true),
      )
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ToolConfig")
  }

  pub fn strip_keys(&self) -> StripKeys {
    self.strip_keys.iter().map(String::as_str).collect()
  }

  /// Expand a leading `~` in the store path to the user's home directory.
  pub fn store_path(&self) -> PathBuf {
    let s = self.store_path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/")
      && let Ok(home) = std::env::var("HOME")
    {
      return PathBuf::from(home).join(rest);
    }
    self.store_path.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ToolConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.document_key, "cv");
    assert_eq!(cfg.store_path, PathBuf::from("cvtool.db"));
    assert_eq!(cfg.strip_keys(), StripKeys::default());
  }

  #[test]
  fn empty_strip_list_keeps_every_key() {
    let cfg = ToolConfig {
      strip_keys: vec![],
      ..Default::default()
    };
    assert!(!cfg.strip_keys().contains("id"));
  }
}
