//! Coordinate normalization for decoded cells

use serde::Serialize;

use crate::cells::Cell;

/// Inclusive bounding box of a cell set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

/// Compute the bounding box of `cells`, or `None` if there are none.
pub fn bounds(cells: &[Cell]) -> Option<CellBounds> {
    let first = cells.first()?;
    let init = CellBounds { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };

    Some(cells.iter().fold(init, |b, c| CellBounds {
        min_x: b.min_x.min(c.x),
        min_y: b.min_y.min(c.y),
        max_x: b.max_x.max(c.x),
        max_y: b.max_y.max(c.y),
    }))
}

/// Translate cells so the smallest x and y become zero.
///
/// Order and color indices are preserved. An empty slice gives an empty
/// result, and already normalized input comes back unchanged.
///
/// # Examples
///
/// ```
/// use gridpaint::cells::Cell;
/// use gridpaint::normalize::normalize;
///
/// let cells = vec![Cell::new(-3, 2, 1), Cell::new(1, -4, 2)];
/// let normalized = normalize(&cells);
/// assert_eq!(normalized, vec![Cell::new(0, 6, 1), Cell::new(4, 0, 2)]);
/// ```
pub fn normalize(cells: &[Cell]) -> Vec<Cell> {
    let Some(b) = bounds(cells) else {
        return Vec::new();
    };

    // Decoded coordinates are 16-bit, so the differences always fit
    cells
        .iter()
        .map(|c| Cell {
            x: c.x.saturating_sub(b.min_x),
            y: c.y.saturating_sub(b.min_y),
            color_index: c.color_index,
        })
        .collect()
}
