//! Composition of normalized cells into pixel fill instructions
//!
//! The compositor is surface-agnostic: it only says which rectangles to
//! fill with which color. [`crate::raster`] turns the result into an image.
//!
//! Grid y grows upwards in the editor, so rows are flipped: the cell with
//! the largest y is drawn at the top of the picture.

use serde::Serialize;
use thiserror::Error;

use crate::cells::Cell;
use crate::models::Palette;

/// Divisor turning an alpha byte into an opacity.
///
/// Opacity is `alpha / 256`, so a fully opaque entry draws at 255/256.
pub const ALPHA_DIVISOR: f32 = 256.0;

/// Error when composing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CompositeError {
    /// The pixel scale must be at least 1
    #[error("scale must be positive")]
    InvalidScale,
    /// The canvas would not fit in 32-bit pixel coordinates
    #[error("{width}x{height} grid at scale {scale} overflows pixel coordinates")]
    CanvasOverflow { width: u32, height: u32, scale: u32 },
    /// A cell has a negative coordinate, the input was not normalized
    #[error("cell ({x}, {y}) has a negative coordinate, cells must be normalized")]
    NotNormalized { x: i32, y: i32 },
    /// A cell references a color the palette does not have
    #[error("color index {index} is outside palette '{palette}' ({len} colors)")]
    PaletteLookup { index: u16, palette: String, len: usize },
}

/// Size of the cell grid in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

/// Fill color of one rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 255/256]`
    pub opacity: f32,
}

impl FillColor {
    /// CSS color with the opacity rounded to two decimals, e.g.
    /// `rgb(255 0 0 / 0.50)`.
    pub fn to_css(&self) -> String {
        format!("rgb({} {} {} / {:.2})", self.r, self.g, self.b, self.opacity)
    }
}

/// One square to fill, in pixels from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillInstruction {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub color: FillColor,
}

/// Compositor output for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub grid: GridSize,
    pub scale: u32,
    /// One fill per cell, in cell order
    pub fills: Vec<FillInstruction>,
}

impl Composition {
    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.grid.width * self.scale, self.grid.height * self.scale)
    }
}

/// Grid size covering every cell, at least 1x1.
///
/// # Examples
///
/// ```
/// use gridpaint::cells::Cell;
/// use gridpaint::compositor::{grid_size, GridSize};
///
/// let cells = [Cell::new(0, 0, 1), Cell::new(2, 3, 1)];
/// assert_eq!(grid_size(&cells), GridSize { width: 3, height: 4 });
/// assert_eq!(grid_size(&[]), GridSize { width: 1, height: 1 });
/// ```
pub fn grid_size(cells: &[Cell]) -> GridSize {
    let (max_x, max_y) = cells
        .iter()
        .fold((0u32, 0u32), |(mx, my), c| (mx.max(non_negative(c.x)), my.max(non_negative(c.y))));
    GridSize { width: max_x + 1, height: max_y + 1 }
}

fn non_negative(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

/// Opacity for an alpha byte.
pub fn opacity(alpha: u8) -> f32 {
    f32::from(alpha) / ALPHA_DIVISOR
}

/// Turn normalized cells into fill instructions at `scale` pixels per cell.
///
/// Fails if any cell's color index is outside `palette`; nothing is
/// partially composed.
pub fn composite(cells: &[Cell], palette: &Palette, scale: u32) -> Result<Composition, CompositeError> {
    if scale == 0 {
        return Err(CompositeError::InvalidScale);
    }

    let grid = grid_size(cells);
    if grid.width.checked_mul(scale).is_none() || grid.height.checked_mul(scale).is_none() {
        return Err(CompositeError::CanvasOverflow { width: grid.width, height: grid.height, scale });
    }

    let mut fills = Vec::with_capacity(cells.len());

    for cell in cells {
        let (Ok(x), Ok(y)) = (u32::try_from(cell.x), u32::try_from(cell.y)) else {
            return Err(CompositeError::NotNormalized { x: cell.x, y: cell.y });
        };

        let rgba = palette.get(cell.color_index).ok_or_else(|| CompositeError::PaletteLookup {
            index: cell.color_index,
            palette: palette.name.clone(),
            len: palette.len(),
        })?;
        let [r, g, b, a] = rgba.0;

        fills.push(FillInstruction {
            x: x * scale,
            y: (grid.height - 1 - y) * scale,
            size: scale,
            color: FillColor { r, g, b, opacity: opacity(a) },
        });
    }

    Ok(Composition { grid, scale, fills })
}
