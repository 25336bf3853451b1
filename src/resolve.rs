//! Palette resolution from a scene's mesh library reference
//!
//! A painting scene points at the mesh library its cell items come from:
//!
//! ```text
//! [ext_resource path="res://paintings/canvas_colors.meshlib" type="MeshLibrary" id=1]
//! ```
//!
//! The file stem (`canvas_colors`) is the key looked up in the registry.
//! Godot 4 writes `type` before `path`; both orders are recognised.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::Palette;
use crate::registry::PaletteLookup;
use crate::suggest::{format_suggestion, suggest};

/// Maximum edit distance for "did you mean" hints
const SUGGEST_DISTANCE: usize = 3;

/// Error when a document's palette cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PaletteError {
    /// No mesh library reference in the document
    #[error("no MeshLibrary resource found")]
    MarkerNotFound,
    /// The mesh library name is not in the registry
    #[error("unknown palette '{key}'{}", suggestion.as_deref().map(|s| format!(". {}", s)).unwrap_or_default())]
    UnknownKey { key: String, suggestion: Option<String> },
}

fn path_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"path="([^"]*?)\.meshlib"\s+type="MeshLibrary""#).expect("pattern is valid")
    })
}

fn type_path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"type="MeshLibrary"[^\]\n]*?path="([^"]*?)\.meshlib""#)
            .expect("pattern is valid")
    })
}

/// Path of the first mesh library referenced by `text`, without the
/// `.meshlib` extension.
///
/// # Examples
///
/// ```
/// use gridpaint::resolve::extract_palette_path;
///
/// let text = r#"[ext_resource path="res://libs/canvas.meshlib" type="MeshLibrary" id=1]"#;
/// assert_eq!(extract_palette_path(text), Some("res://libs/canvas"));
/// ```
pub fn extract_palette_path(text: &str) -> Option<&str> {
    [path_type_pattern(), type_path_pattern()]
        .iter()
        .filter_map(|pattern| pattern.captures(text))
        .filter_map(|caps| caps.get(1))
        .min_by_key(|m| m.start())
        .map(|m| m.as_str())
}

/// Final segment of a resource path.
pub fn palette_key(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Resolves documents to palettes using an injected registry.
#[derive(Clone, Copy)]
pub struct PaletteResolver<'r> {
    registry: &'r dyn PaletteLookup,
}

impl std::fmt::Debug for PaletteResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteResolver").field("palettes", &self.registry.keys()).finish()
    }
}

impl<'r> PaletteResolver<'r> {
    pub fn new(registry: &'r dyn PaletteLookup) -> Self {
        Self { registry }
    }

    /// Key of the document's palette, without consulting the registry.
    pub fn key<'t>(&self, text: &'t str) -> Result<&'t str, PaletteError> {
        extract_palette_path(text).map(palette_key).ok_or(PaletteError::MarkerNotFound)
    }

    /// Look up the palette a document references.
    pub fn resolve(&self, text: &str) -> Result<&'r Palette, PaletteError> {
        let key = self.key(text)?;
        self.registry.lookup(key).ok_or_else(|| {
            let keys = self.registry.keys();
            PaletteError::UnknownKey {
                key: key.to_string(),
                suggestion: format_suggestion(&suggest(key, &keys, SUGGEST_DISTANCE)),
            }
        })
    }
}
