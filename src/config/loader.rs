// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_LOG_FILTER;
use crate::errors::ConfigError;
use crate::process::Options;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Host-side configuration for building and executing processes.
///
/// Every section is optional; a missing section takes its default.
///
/// # Fields
/// * `logging` - tracing filter and formatting
/// * `definitions` - allow-list consulted when workers resolve definitions
/// * `options` - default build options, overridden by options passed explicitly
///
/// # Example
/// ```yaml
/// logging:
///   filter: "info,tasktronaut=debug"
/// definitions:
///   allowed:
///     - "my_app::Onboarding"
/// options:
///   notify: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub definitions: DefinitionsConfig,
    #[serde(default)]
    pub options: Options,
}

impl Config {
    /// Merge the configured default options with `explicit`. Explicit values
    /// win on key collisions.
    pub fn build_options(&self, explicit: Options) -> Options {
        let mut options = self.options.clone();
        options.extend(explicit);
        options
    }
}

/// Logging configuration.
///
/// # Fields
/// * `filter` - `EnvFilter` directives, used when `RUST_LOG` is not set
/// * `with_target` - include the event target in formatted output
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            with_target: false,
        }
    }
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Definitions a worker may reconstruct, as `module::Name`. Empty means every
/// registered definition.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DefinitionsConfig {
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// Load a config from a YAML (`.yaml`, `.yml`) or TOML (`.toml`) file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let content = fs::read_to_string(path)?;
    let cfg: Config = match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    };
    Ok(cfg)
}
