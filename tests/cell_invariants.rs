//! Property tests for cell decoding and normalization

use gridpaint::cells::{decode_cells, Cell};
use gridpaint::compositor::{composite, grid_size};
use gridpaint::models::Palette;
use gridpaint::normalize::{bounds, normalize};
use proptest::prelude::*;

/// Pack a cell the way the editor stores it.
fn encode(cell: &Cell) -> [u32; 3] {
    let position = ((cell.y as u32 & 0xFFFF) << 16) | (cell.x as u32 & 0xFFFF);
    [position, 0, u32::from(cell.color_index)]
}

fn scene(cells: &[Cell], signed: bool) -> String {
    let ints: Vec<String> = cells
        .iter()
        .flat_map(encode)
        .map(|v| if signed { (v as i32).to_string() } else { v.to_string() })
        .collect();
    format!("data = {{\n\"cells\": PoolIntArray( {} )\n}}\n", ints.join(", "))
}

fn any_cell() -> impl Strategy<Value = Cell> {
    (any::<i16>(), any::<i16>(), any::<u16>()).prop_map(|(x, y, c)| Cell::new(i32::from(x), i32::from(y), c))
}

proptest! {
    #[test]
    fn decode_recovers_every_cell(cells in prop::collection::vec(any_cell(), 0..64), signed in any::<bool>()) {
        let decoded = decode_cells(&scene(&cells, signed)).unwrap();
        prop_assert_eq!(decoded, cells);
    }

    #[test]
    fn normalized_minimum_is_zero(cells in prop::collection::vec(any_cell(), 1..64)) {
        let b = bounds(&normalize(&cells)).unwrap();
        prop_assert_eq!((b.min_x, b.min_y), (0, 0));
    }

    #[test]
    fn normalize_preserves_offsets(cells in prop::collection::vec(any_cell(), 1..64)) {
        let normalized = normalize(&cells);
        prop_assert_eq!(normalized.len(), cells.len());
        for (before, after) in cells.iter().zip(&normalized) {
            prop_assert_eq!(before.x - cells[0].x, after.x - normalized[0].x);
            prop_assert_eq!(before.y - cells[0].y, after.y - normalized[0].y);
            prop_assert_eq!(before.color_index, after.color_index);
        }
    }

    #[test]
    fn normalize_is_idempotent(cells in prop::collection::vec(any_cell(), 0..64)) {
        let once = normalize(&cells);
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn every_fill_is_inside_the_canvas(
        cells in prop::collection::vec((0i32..40, 0i32..40, 0u16..4), 1..64),
        scale in 1u32..8,
    ) {
        let cells: Vec<Cell> = cells.into_iter().map(|(x, y, c)| Cell::new(x, y, c)).collect();
        let palette = Palette::from_rgba("p", &[[0, 0, 0, 255]; 4]);
        let composition = composite(&cells, &palette, scale).unwrap();
        let (width, height) = composition.pixel_size();
        let grid = grid_size(&cells);

        prop_assert_eq!((width, height), (grid.width * scale, grid.height * scale));
        for fill in &composition.fills {
            prop_assert!(fill.x + fill.size <= width);
            prop_assert!(fill.y + fill.size <= height);
        }
    }
}
