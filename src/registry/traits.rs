//! Lookup traits implemented by registries.

use crate::models::Palette;

/// Common trait for registries that store named items.
///
/// # Example
///
/// ```
/// use gridpaint::models::Palette;
/// use gridpaint::registry::{PaletteRegistry, Registry};
///
/// let mut registry = PaletteRegistry::new();
/// registry.register(Palette::from_rgba("mono", &[[255, 255, 255, 255]]));
///
/// assert!(registry.contains("mono"));
/// assert_eq!(registry.len(), 1);
/// ```
pub trait Registry<V> {
    /// Check if an item with the given name exists in the registry.
    fn contains(&self, name: &str) -> bool;

    /// Get an item by name.
    fn get(&self, name: &str) -> Option<&V>;

    /// Get the number of items in the registry.
    fn len(&self) -> usize;

    /// Check if the registry is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all items from the registry.
    fn clear(&mut self);

    /// Get an iterator over all names in the registry.
    fn names(&self) -> Box<dyn Iterator<Item = &String> + '_>;
}

/// Read-only palette source consulted by [`crate::resolve::PaletteResolver`].
///
/// Implementors must be shareable across threads, since batches resolve
/// documents in parallel.
pub trait PaletteLookup: Sync {
    /// Palette registered under `key`.
    fn lookup(&self, key: &str) -> Option<&Palette>;

    /// All keys, used for "did you mean" hints.
    fn keys(&self) -> Vec<&str>;
}
