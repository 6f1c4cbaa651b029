// src/config.rs

//! Configuration for `ruisapp`.
//!
//! Settings are read from a JSON file and every level falls back to defaults,
//! so a config file only needs the fields it wants to change:
//!
//! ```json
//! { "window": { "title": "demo", "width": 1024 } }
//! ```
//!
//! Lookup order for the file:
//! 1. `$RUISAPP_CONFIG`
//! 2. `$XDG_CONFIG_HOME/ruisapp/config.json`
//! 3. `$HOME/.config/ruisapp/config.json`
//!
//! A missing file yields the defaults. A file that fails to parse is logged
//! and ignored.

use crate::platform::backends::WindowAttributes;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RUISAPP_CONFIG";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

/// Root of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub window: WindowConfig,
    pub app: AppConfig,
}

/// Which display server to connect to.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Display name such as `":1"`. `None` uses the `DISPLAY` environment
    /// variable.
    pub name: Option<String>,
}

/// Initial geometry and title of the main window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        let attrs = WindowAttributes::default();
        WindowConfig {
            title: attrs.title,
            x: attrs.x,
            y: attrs.y,
            width: attrs.width,
            height: attrs.height,
        }
    }
}

impl WindowConfig {
    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes {
            title: self.title.clone(),
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Behaviour of the `ruisapp` binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// How long the binary keeps its main window mapped before exiting.
    pub linger_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig { linger_ms: 2000 }
    }
}

impl Config {
    /// Parses a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse configuration JSON")
    }

    /// Reads `path`. Returns `Ok(None)` if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()))
            }
        };
        Self::from_json(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
            .map(Some)
    }

    /// Loads from the first configured location, falling back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            debug!("No config location available; using defaults.");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(Some(config)) => {
                info!("Configuration loaded from {}", path.display());
                config
            }
            Ok(None) => {
                debug!("No config file at {}; using defaults.", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("{:#}. Using default configuration.", e);
                Self::default()
            }
        }
    }
}

/// Resolves the config file location from the environment.
pub fn config_path() -> Option<PathBuf> {
    resolve_config_path(
        env::var_os(CONFIG_ENV_VAR).map(PathBuf::from),
        env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        env::var_os("HOME").map(PathBuf::from),
    )
}

fn resolve_config_path(
    explicit: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Some(path);
    }
    xdg_config_home
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| home.map(|h| h.join(".config")))
        .map(|dir| dir.join("ruisapp").join("config.json"))
}
