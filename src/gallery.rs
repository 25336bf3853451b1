//! Contact sheets - many previews laid out on one image

use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::raster::{check_canvas, RasterError, TRANSPARENT};

/// Magenta used for documents that produced no preview
pub const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// One slot on a contact sheet, labelled with its document name.
#[derive(Debug, Clone)]
pub struct Tile {
    pub name: String,
    /// The rendered preview, or `None` for a placeholder
    pub image: Option<RgbaImage>,
}

impl Tile {
    pub fn preview(name: impl Into<String>, image: RgbaImage) -> Self {
        Self { name: name.into(), image: Some(image) }
    }

    pub fn placeholder(name: impl Into<String>) -> Self {
        Self { name: name.into(), image: None }
    }
}

/// Layout settings for [`render_sheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Tiles per row (at least 1)
    pub columns: u32,
    /// Transparent gap between tiles, in pixels
    pub padding: u32,
    /// Slot size used when no tile is a rendered preview
    pub placeholder_size: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self { columns: 4, padding: 0, placeholder_size: 10 }
    }
}

/// Where a document landed on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rendered: bool,
}

/// A composed contact sheet and the label of every slot.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub image: RgbaImage,
    pub placements: Vec<Placement>,
}

/// Lay tiles out left to right, top to bottom.
///
/// Every slot is as large as the largest preview; smaller previews sit in
/// the slot's top-left corner and placeholders fill their whole slot. The
/// sheet is held to the same pixel cap as a single preview.
///
/// # Examples
///
/// ```
/// use gridpaint::gallery::{render_sheet, SheetLayout, Tile};
/// use image::RgbaImage;
///
/// let tile = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
/// let tiles = vec![
///     Tile::preview("a.tscn", tile.clone()),
///     Tile::placeholder("b.tscn"),
///     Tile::preview("c.tscn", tile),
/// ];
///
/// let layout = SheetLayout { columns: 2, ..Default::default() };
/// let sheet = render_sheet(&tiles, layout).unwrap();
/// assert_eq!(sheet.image.dimensions(), (4, 4));
/// assert_eq!(sheet.placements[2].name, "c.tscn");
/// assert_eq!((sheet.placements[2].x, sheet.placements[2].y), (0, 2));
/// ```
pub fn render_sheet(tiles: &[Tile], layout: SheetLayout) -> Result<Sheet, RasterError> {
    if tiles.is_empty() {
        return Ok(Sheet { image: RgbaImage::from_pixel(1, 1, TRANSPARENT), placements: Vec::new() });
    }

    let (slot_w, slot_h) = tiles
        .iter()
        .filter_map(|t| t.image.as_ref().map(RgbaImage::dimensions))
        .reduce(|(w, h), (tw, th)| (w.max(tw), h.max(th)))
        .unwrap_or((layout.placeholder_size.max(1), layout.placeholder_size.max(1)));

    let count = u32::try_from(tiles.len()).map_err(|_| RasterError::DimensionOverflow)?;
    let columns = layout.columns.clamp(1, count);
    let rows = count.div_ceil(columns);
    let pad = u64::from(layout.padding);

    let span = |n: u32, slot: u32| u64::from(n) * u64::from(slot) + u64::from(n - 1) * pad;
    let (sheet_w, sheet_h) = check_canvas(span(columns, slot_w), span(rows, slot_h))?;
    let mut image = RgbaImage::from_pixel(sheet_w, sheet_h, TRANSPARENT);
    let mut placements = Vec::with_capacity(tiles.len());

    let offset = |n: u32, slot: u32| {
        u32::try_from(u64::from(n) * (u64::from(slot) + pad)).map_err(|_| RasterError::DimensionOverflow)
    };

    for (i, tile) in (0u32..).zip(tiles) {
        let dest_x = offset(i % columns, slot_w)?;
        let dest_y = offset(i / columns, slot_h)?;

        match &tile.image {
            Some(preview) => {
                for (x, y, pixel) in preview.enumerate_pixels() {
                    image.put_pixel(dest_x + x, dest_y + y, *pixel);
                }
            }
            None => {
                for y in 0..slot_h {
                    for x in 0..slot_w {
                        image.put_pixel(dest_x + x, dest_y + y, MAGENTA);
                    }
                }
            }
        }

        let (width, height) = tile.image.as_ref().map_or((slot_w, slot_h), RgbaImage::dimensions);
        placements.push(Placement {
            name: tile.name.clone(),
            x: dest_x,
            y: dest_y,
            width,
            height,
            rendered: tile.image.is_some(),
        });
    }

    Ok(Sheet { image, placements })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(name: &str, w: u32, h: u32, c: [u8; 4]) -> Tile {
        Tile::preview(name, RgbaImage::from_pixel(w, h, Rgba(c)))
    }

    #[test]
    fn test_empty_sheet() {
        let sheet = render_sheet(&[], SheetLayout::default()).unwrap();
        assert_eq!(sheet.image.dimensions(), (1, 1));
        assert!(sheet.placements.is_empty());
    }

    #[test]
    fn test_single_row_when_fewer_tiles_than_columns() {
        let tiles = vec![solid("a", 3, 2, [1, 0, 0, 255]), solid("b", 3, 2, [2, 0, 0, 255])];
        let sheet = render_sheet(&tiles, SheetLayout { columns: 8, ..Default::default() }).unwrap();
        assert_eq!(sheet.image.dimensions(), (6, 2));
        assert_eq!(sheet.image.get_pixel(0, 0)[0], 1);
        assert_eq!(sheet.image.get_pixel(3, 0)[0], 2);
    }

    #[test]
    fn test_slots_sized_by_largest_preview() {
        let tiles = vec![solid("small", 1, 1, [9, 9, 9, 255]), solid("big", 4, 3, [7, 7, 7, 255])];
        let sheet = render_sheet(&tiles, SheetLayout { columns: 1, ..Default::default() }).unwrap();
        assert_eq!(sheet.image.dimensions(), (4, 6));
        // small preview leaves the rest of its slot transparent
        assert_eq!(*sheet.image.get_pixel(3, 2), TRANSPARENT);
        assert_eq!(*sheet.image.get_pixel(0, 3), Rgba([7, 7, 7, 255]));
    }

    #[test]
    fn test_placeholder_fills_slot() {
        let tiles = vec![solid("ok", 2, 2, [0, 0, 0, 255]), Tile::placeholder("broken")];
        let sheet = render_sheet(&tiles, SheetLayout { columns: 2, ..Default::default() }).unwrap();
        assert_eq!(*sheet.image.get_pixel(2, 0), MAGENTA);
        assert_eq!(*sheet.image.get_pixel(3, 1), MAGENTA);
    }

    #[test]
    fn test_only_placeholders_use_placeholder_size() {
        let layout = SheetLayout { columns: 2, padding: 0, placeholder_size: 5 };
        let sheet = render_sheet(&[Tile::placeholder("a"), Tile::placeholder("b")], layout).unwrap();
        assert_eq!(sheet.image.dimensions(), (10, 5));
    }

    #[test]
    fn test_padding_between_tiles() {
        let tiles = vec![
            solid("a", 2, 2, [1, 0, 0, 255]),
            solid("b", 2, 2, [2, 0, 0, 255]),
            solid("c", 2, 2, [3, 0, 0, 255]),
        ];
        let layout = SheetLayout { columns: 2, padding: 1, placeholder_size: 1 };
        let sheet = render_sheet(&tiles, layout).unwrap();

        assert_eq!(sheet.image.dimensions(), (5, 5));
        assert_eq!(*sheet.image.get_pixel(2, 0), TRANSPARENT);
        assert_eq!(sheet.image.get_pixel(3, 0)[0], 2);
        assert_eq!(sheet.image.get_pixel(0, 3)[0], 3);
    }

    #[test]
    fn test_placements_name_every_slot() {
        let tiles = vec![solid("heart.tscn", 2, 1, [1, 0, 0, 255]), Tile::placeholder("broken.tscn")];
        let layout = SheetLayout { columns: 1, padding: 1, placeholder_size: 1 };
        let sheet = render_sheet(&tiles, layout).unwrap();

        assert_eq!(
            sheet.placements,
            vec![
                Placement { name: "heart.tscn".into(), x: 0, y: 0, width: 2, height: 1, rendered: true },
                Placement { name: "broken.tscn".into(), x: 0, y: 2, width: 2, height: 1, rendered: false },
            ]
        );
    }

    #[test]
    fn test_sheet_over_pixel_cap_is_rejected() {
        // each tile is tiny; the padding alone pushes the sheet past the cap
        let tiles: Vec<Tile> = (0..4).map(|i| solid(&format!("t{}", i), 1, 1, [0, 0, 0, 255])).collect();
        let layout = SheetLayout { columns: 2, padding: 10_000, placeholder_size: 1 };
        assert!(matches!(render_sheet(&tiles, layout), Err(RasterError::TooLarge { .. })));

        let layout = SheetLayout { columns: 1, padding: 0, placeholder_size: 100_000 };
        assert!(matches!(render_sheet(&[Tile::placeholder("p")], layout), Err(RasterError::TooLarge { .. })));
    }

    #[test]
    fn test_sheet_dimension_overflow_is_rejected() {
        let tiles = vec![solid("a", 1, 1, [0, 0, 0, 255]), solid("b", 1, 1, [0, 0, 0, 255])];
        let layout = SheetLayout { columns: 2, padding: u32::MAX, placeholder_size: 1 };
        assert_eq!(render_sheet(&tiles, layout).unwrap_err(), RasterError::DimensionOverflow);
    }
}
