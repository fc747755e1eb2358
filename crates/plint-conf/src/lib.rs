//! Layered configuration: defaults, then `.plint.toml`, then `plint.toml`
//! in the project root. Missing files are fine; malformed TOML is an error.

use std::path::Path;

use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
}

/// Per-rule enable switches; everything is on by default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Rules {
    pub broken_template: bool,
    pub empty_lines: bool,
    pub indent: bool,
    pub no_undef: bool,
    pub no_interpolation: bool,
    pub quotes: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            broken_template: true,
            empty_lines: true,
            indent: true,
            no_undef: true,
            no_interpolation: true,
            quotes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Spaces per nesting level.
    pub indent_step: u32,
    /// Cap on loop-body recursion during variable analysis.
    pub max_scope_depth: u32,
    /// Extra identifiers considered always defined.
    pub globals: Vec<String>,
    pub rules: Rules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_step: 2,
            max_scope_depth: 32,
            globals: Vec::new(),
            rules: Rules::default(),
        }
    }
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(
                File::from(project_root.join(".plint.toml"))
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                File::from(project_root.join("plint.toml"))
                    .format(FileFormat::Toml)
                    .required(false),
            );

        let config = builder.build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }
}
