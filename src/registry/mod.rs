//! Registries for named items.
//!
//! The palette registry is built once at startup (built-ins, then an
//! optional JSON registry file, then configured palettes) and is read-only
//! while documents are processed.

mod palette;
mod traits;

pub use palette::{PaletteRegistry, RegistryError};
pub use traits::{PaletteLookup, Registry};

use std::path::Path;

use crate::config::schema::GridpaintConfig;
use crate::models::Palette;

/// Build the registry used for rendering.
///
/// `config_dir` resolves relative paths in the configuration, and
/// `extra_file` is a JSON registry given on the command line; it is merged
/// after the configured one.
pub fn build_registry(
    config: &GridpaintConfig,
    config_dir: &Path,
    extra_file: Option<&Path>,
) -> Result<PaletteRegistry, RegistryError> {
    let mut registry = PaletteRegistry::with_builtins();

    if let Some(file) = &config.registry.file {
        let path = config_dir.join(file);
        let count = registry.load_json(&path)?;
        tracing::debug!(path = %path.display(), count, "loaded palette registry file");
    }

    if let Some(path) = extra_file {
        let count = registry.load_json(path)?;
        tracing::debug!(path = %path.display(), count, "loaded palette registry file");
    }

    for (name, def) in &config.palettes {
        let colors = def
            .colors
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                spec.to_rgba().map_err(|source| RegistryError::InvalidColor {
                    palette: name.clone(),
                    index,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        registry.register(Palette::new(name.clone(), colors));
    }

    tracing::info!(palettes = registry.len(), "palette registry ready");
    Ok(registry)
}
