//! Palette registry for mesh library keys.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::color::ColorError;
use crate::models::Palette;
use crate::palettes;

use super::traits::{PaletteLookup, Registry};

/// Error when loading palettes into the registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// Registry file could not be read
    #[error("Failed to read palette registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Registry file is not valid JSON in the expected shape
    #[error("Invalid palette registry: {0}")]
    Json(#[from] serde_json::Error),
    /// A configured palette color could not be parsed
    #[error("Palette '{palette}' color {index}: {source}")]
    InvalidColor {
        palette: String,
        index: usize,
        #[source]
        source: ColorError,
    },
    /// A palette was declared without any colors
    #[error("Palette '{0}' has no colors")]
    EmptyPalette(String),
}

/// Registry of palettes keyed by mesh library name.
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    palettes: HashMap<String, Palette>,
}

impl PaletteRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { palettes: HashMap::new() }
    }

    /// Create a registry holding every built-in palette.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in palettes::list_builtins() {
            if let Some(palette) = palettes::get_builtin(name) {
                registry.register(palette);
            }
        }
        registry
    }

    /// Register a palette in the registry.
    ///
    /// If a palette with the same name already exists, it is replaced.
    pub fn register(&mut self, palette: Palette) {
        self.palettes.insert(palette.name.clone(), palette);
    }

    /// Merge palettes from a JSON registry file.
    ///
    /// The file maps keys to color lists, one `[r, g, b, a]` array per
    /// index:
    ///
    /// ```json
    /// { "canvas_colors": [[0, 0, 0, 255], [255, 0, 0, 128]] }
    /// ```
    ///
    /// Returns the number of palettes read.
    pub fn load_json(&mut self, path: &Path) -> Result<usize, RegistryError> {
        let content = fs::read_to_string(path)
            .map_err(|source| RegistryError::Io { path: path.to_path_buf(), source })?;
        self.merge_json(&content)
    }

    /// Merge palettes from JSON text in the registry file format.
    pub fn merge_json(&mut self, json: &str) -> Result<usize, RegistryError> {
        let entries: BTreeMap<String, Vec<[u8; 4]>> = serde_json::from_str(json)?;

        if let Some((name, _)) = entries.iter().find(|(_, colors)| colors.is_empty()) {
            return Err(RegistryError::EmptyPalette(name.clone()));
        }

        let count = entries.len();
        for (name, colors) in entries {
            self.register(Palette::from_rgba(name, &colors));
        }
        Ok(count)
    }

    /// Registered names in sorted order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.palettes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Registry<Palette> for PaletteRegistry {
    fn contains(&self, name: &str) -> bool {
        self.palettes.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    fn len(&self) -> usize {
        self.palettes.len()
    }

    fn clear(&mut self) {
        self.palettes.clear();
    }

    fn names(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(self.palettes.keys())
    }
}

impl PaletteLookup for PaletteRegistry {
    fn lookup(&self, key: &str) -> Option<&Palette> {
        self.palettes.get(key)
    }

    fn keys(&self) -> Vec<&str> {
        self.sorted_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_register_and_get() {
        let mut registry = PaletteRegistry::new();
        registry.register(Palette::from_rgba("wall", &[[1, 2, 3, 255]]));

        assert!(registry.contains("wall"));
        assert_eq!(registry.get("wall").unwrap().get(0), Some(Rgba([1, 2, 3, 255])));
        assert!(registry.lookup("floor").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = PaletteRegistry::new();
        registry.register(Palette::from_rgba("wall", &[[1, 2, 3, 255]]));
        registry.register(Palette::from_rgba("wall", &[[9, 9, 9, 9], [0, 0, 0, 0]]));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("wall").unwrap().len(), 2);
    }

    #[test]
    fn test_with_builtins() {
        let registry = PaletteRegistry::with_builtins();
        assert_eq!(registry.len(), palettes::list_builtins().len());
        assert!(registry.lookup("pico8").is_some());
    }

    #[test]
    fn test_merge_json() {
        let mut registry = PaletteRegistry::with_builtins();
        let count = registry
            .merge_json(r#"{"canvas": [[255, 0, 0, 128], [0, 0, 0, 255]], "pico8": [[1, 1, 1, 1]]}"#)
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(registry.lookup("canvas").unwrap().get(0), Some(Rgba([255, 0, 0, 128])));
        // File entries replace built-ins of the same name
        assert_eq!(registry.lookup("pico8").unwrap().len(), 1);
    }

    #[test]
    fn test_merge_json_rejects_bad_shapes() {
        let mut registry = PaletteRegistry::new();
        assert!(matches!(registry.merge_json(r#"{"a": [[256, 0, 0, 0]]}"#), Err(RegistryError::Json(_))));
        assert!(matches!(registry.merge_json(r#"{"a": [[1, 2, 3]]}"#), Err(RegistryError::Json(_))));
        assert!(matches!(registry.merge_json("[]"), Err(RegistryError::Json(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_merge_json_rejects_empty_palette() {
        let mut registry = PaletteRegistry::new();
        let err = registry.merge_json(r#"{"blank": []}"#).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyPalette(name) if name == "blank"));
    }

    #[test]
    fn test_load_json_missing_file() {
        let mut registry = PaletteRegistry::new();
        let err = registry.load_json(Path::new("/nonexistent/palettes.json")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn test_sorted_names_and_clear() {
        let mut registry = PaletteRegistry::new();
        registry.register(Palette::from_rgba("b", &[[0, 0, 0, 0]]));
        registry.register(Palette::from_rgba("a", &[[0, 0, 0, 0]]));
        assert_eq!(registry.keys(), vec!["a", "b"]);
        assert_eq!(registry.names().count(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }
}
