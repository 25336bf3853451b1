//! gridpaint - Previews of Godot GridMap paintings
//!
//! This library provides functionality to:
//! - Decode the packed `cells` array of a GridMap scene into `(x, y, color)` cells
//! - Resolve the scene's palette from its mesh library reference
//! - Compose and rasterize the cells into a PNG preview or a contact sheet
//! - Re-render previews on file changes, discarding stale results

pub mod cells;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod gallery;
pub mod generation;
pub mod models;
pub mod normalize;
pub mod output;
pub mod palettes;
pub mod pipeline;
pub mod raster;
pub mod registry;
pub mod resolve;
pub mod suggest;
pub mod watch;
