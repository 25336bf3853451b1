//! Indexed palette type.

use image::Rgba;

/// An indexed color table.
///
/// Color indices are 0-based and contiguous; index `i` maps to
/// `colors[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    /// Registry key the palette is known by
    pub name: String,
    /// Colors by index
    pub colors: Vec<Rgba<u8>>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<Rgba<u8>>) -> Self {
        Self { name: name.into(), colors }
    }

    /// Build a palette from `[r, g, b, a]` quadruples.
    pub fn from_rgba(name: impl Into<String>, colors: &[[u8; 4]]) -> Self {
        Self::new(name, colors.iter().map(|&c| Rgba(c)).collect())
    }

    /// Color for `index`, or `None` when the index is past the end.
    pub fn get(&self, index: u16) -> Option<Rgba<u8>> {
        self.colors.get(usize::from(index)).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
