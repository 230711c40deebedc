//! Playground configuration management for `threepen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [serve], [preview], [revision]
//! ├── types/         # ConfigError, global handle
//! ├── util.rs        # config discovery, URL checks
//! └── mod.rs         # PlaygroundConfig (this file)
//! ```
//!
//! The config file is optional: without one every section uses its defaults
//! and the project root is the current directory.

pub mod section;
pub mod types;
mod util;

use util::{find_config_file, is_http_url};

pub use section::{PreviewConfig, RevisionConfig, ServeConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{
    cli::{Cli, Commands, PreviewArgs},
    log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing threepen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Absolute path to the config file, whether or not it exists
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    /// Revision pinned on the command line (skips `Latest`)
    #[serde(skip)]
    pub pinned_revision: Option<u32>,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Preview pipeline settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Release catalog and CDN settings
    #[serde(default)]
    pub revision: RevisionConfig,
}

impl PlaygroundConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing file is not
    /// an error: defaults apply and cwd becomes the project root.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd.clone());
                config.config_path = path;
                config
            }
            None => Self {
                config_path: cwd.join(&cli.config),
                root: cwd.clone(),
                ..Self::default()
            },
        };

        crate::logger::set_verbose(cli.verbose);
        config.apply_command_options(cli, &cwd);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored):", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply command-specific configuration options.
    ///
    /// Paths given on the command line are relative to cwd, not the root.
    fn apply_command_options(&mut self, cli: &Cli, cwd: &Path) {
        match &cli.command {
            Commands::Serve {
                entry,
                interface,
                port,
                preview,
            } => {
                self.apply_entry(entry.as_deref(), cwd);
                self.apply_preview_args(preview);
                if let Some(interface) = interface {
                    self.serve.interface = *interface;
                }
                if let Some(port) = port {
                    self.serve.port = *port;
                }
            }
            Commands::Compose { entry, preview, .. } => {
                self.apply_entry(entry.as_deref(), cwd);
                self.apply_preview_args(preview);
            }
            Commands::Versions { .. } => {}
        }
    }

    fn apply_entry(&mut self, entry: Option<&Path>, cwd: &Path) {
        if let Some(entry) = entry {
            self.preview.entry = cwd.join(entry);
        }
    }

    fn apply_preview_args(&mut self, args: &PreviewArgs) {
        if let Some(ms) = args.debounce {
            self.preview.debounce_ms = ms;
        }
        self.pinned_revision = args.revision;
    }

    /// Reject values the preview pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview.entry.as_os_str().is_empty() {
            return Err(ConfigError::invalid("preview.entry", "must not be empty"));
        }
        if !is_http_url(&self.preview.polyfill) {
            return Err(ConfigError::invalid(
                "preview.polyfill",
                format!("`{}` is not an http(s) URL", self.preview.polyfill),
            ));
        }
        if !is_http_url(&self.revision.cdn) {
            return Err(ConfigError::invalid(
                "revision.cdn",
                format!("`{}` is not an http(s) URL", self.revision.cdn),
            ));
        }
        if !is_http_url(&self.revision.endpoint) {
            return Err(ConfigError::invalid(
                "revision.endpoint",
                format!("`{}` is not an http(s) URL", self.revision.endpoint),
            ));
        }
        if self.revision.fallback == 0 {
            return Err(ConfigError::invalid("revision.fallback", "must be a positive revision"));
        }
        if self.revision.timeout_secs == 0 {
            return Err(ConfigError::invalid("revision.timeout_secs", "must be at least 1"));
        }
        if self.pinned_revision == Some(0) {
            return Err(ConfigError::invalid("--revision", "must be a positive revision"));
        }
        Ok(())
    }

    /// Absolute path of the sketch file.
    pub fn entry_path(&self) -> PathBuf {
        self.root.join(&self.preview.entry)
    }

    /// Sketch file name for display.
    pub fn entry_name(&self) -> String {
        let entry = self.entry_path();
        entry
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| entry.display().to_string())
    }

    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.preview.debounce_ms)
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> PlaygroundConfig {
    let (parsed, ignored) = PlaygroundConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
