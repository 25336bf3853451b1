//! Configuration for gridpaint
//!
//! Provides types and loading for `gridpaint.toml`.

pub mod loader;
pub mod schema;

pub use loader::{find_config, load_config, ConfigError, LoadedConfig, CONFIG_FILE};
pub use schema::*;
