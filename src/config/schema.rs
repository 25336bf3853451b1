//! Configuration schema types for `gridpaint.toml`
//!
//! Defines the structure and validation rules for gridpaint configuration.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::color::{parse_color, ColorError};

/// Largest scale accepted from configuration or the command line
pub const MAX_SCALE: u32 = 128;

/// Default settings applied to every render
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Pixels per cell edge
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Tiles per row on contact sheets
    #[serde(default = "default_columns")]
    pub columns: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { scale: default_scale(), columns: default_columns() }
    }
}

fn default_scale() -> u32 {
    10
}

fn default_columns() -> u32 {
    4
}

/// Palette registry file settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON registry file, relative to the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// A palette color as written in configuration.
///
/// Either a color string (`"#FF000080"`, `"rebeccapurple"`) or an
/// `[r, g, b, a]` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Text(String),
    Rgba([u8; 4]),
}

impl ColorSpec {
    pub fn to_rgba(&self) -> Result<Rgba<u8>, ColorError> {
        match self {
            ColorSpec::Text(text) => parse_color(text),
            ColorSpec::Rgba(rgba) => Ok(Rgba(*rgba)),
        }
    }
}

/// A palette defined inline in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    pub colors: Vec<ColorSpec>,
}

/// Watch mode configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
    /// Clear terminal between renders
    #[serde(default = "default_true")]
    pub clear_screen: bool,
}

fn default_debounce_ms() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms(), clear_screen: true }
    }
}

/// Complete gridpaint.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridpaintConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Inline palettes, registered last so they win over registry files
    #[serde(default)]
    pub palettes: BTreeMap<String, PaletteConfig>,
    #[serde(default)]
    pub watch: WatchConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "palettes.canvas.colors[2]")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gridpaint.toml: '{}' {}", self.field, self.message)
    }
}

impl GridpaintConfig {
    /// Validate the configuration and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: String| {
            errors.push(ConfigValidationError { field, message });
        };

        if !(1..=MAX_SCALE).contains(&self.defaults.scale) {
            push("defaults.scale".into(), format!("must be between 1 and {}", MAX_SCALE));
        }

        if self.defaults.columns == 0 {
            push("defaults.columns".into(), "must be a positive integer".into());
        }

        for (name, palette) in &self.palettes {
            if palette.colors.is_empty() {
                push(format!("palettes.{}.colors", name), "must contain at least one color".into());
            }
            for (index, spec) in palette.colors.iter().enumerate() {
                if let Err(e) = spec.to_rgba() {
                    push(format!("palettes.{}.colors[{}]", name, index), e.to_string());
                }
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
