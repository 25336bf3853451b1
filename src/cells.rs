//! GridMap cell decoding
//!
//! A GridMap scene stores its cells as a flat integer array inside the
//! `data` dictionary:
//!
//! ```text
//! data = {
//! "cells": PoolIntArray( 65536, 0, 5, 131072, 0, 7 )
//! }
//! ```
//!
//! Every cell takes three consecutive integers `(a, b, c)`:
//!
//! | Integer | Bits    | Meaning                          |
//! |---------|---------|----------------------------------|
//! | `a`     | 0..16   | x, signed 16-bit                 |
//! | `a`     | 16..32  | y, signed 16-bit                 |
//! | `b`     | all     | reserved, never interpreted      |
//! | `c`     | 0..16   | color index, unsigned 16-bit     |

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Number of integers that make up one cell in the stream.
pub const INTS_PER_CELL: usize = 3;

const LOW_HALF: u32 = 0xFFFF;
const SIGN_BIT: i32 = 0x8000;
const HALF_RANGE: i32 = 0x1_0000;

/// Error type for cell decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The document has no `"cells": PoolIntArray(...)` entry
    #[error("no \"cells\" array found")]
    NotFound,
    /// An array entry is not a decimal integer
    #[error("entry {index} ('{token}') is not an integer")]
    InvalidInteger { index: usize, token: String },
    /// An array entry does not fit in 32 bits
    #[error("entry {index} ({value}) does not fit in 32 bits")]
    OutOfRange { index: usize, value: i64 },
    /// The integer count is not a multiple of three
    #[error("cell array has {count} integers, expected a multiple of {}", INTS_PER_CELL)]
    TruncatedTriple { count: usize },
}

/// A decoded grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
    pub color_index: u16,
}

impl Cell {
    pub fn new(x: i32, y: i32, color_index: u16) -> Self {
        Self { x, y, color_index }
    }
}

/// One cell as stored in the scene, three 32-bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedCell {
    /// Packed x (low half) and y (high half)
    pub position: u32,
    /// Second integer of the triple, kept verbatim
    pub reserved: u32,
    /// Color index in the low half
    pub item: u32,
}

impl PackedCell {
    /// Unpack the position and color index.
    ///
    /// # Examples
    ///
    /// ```
    /// use gridpaint::cells::{Cell, PackedCell};
    ///
    /// let packed = PackedCell { position: 0xFFFF, reserved: 0, item: 3 };
    /// assert_eq!(packed.decode(), Cell::new(-1, 0, 3));
    /// ```
    pub fn decode(&self) -> Cell {
        Cell {
            x: sign_extend_16(self.position),
            y: sign_extend_16(self.position >> 16),
            color_index: (self.item & LOW_HALF) as u16,
        }
    }
}

/// Reinterpret the low 16 bits of `bits` as a two's-complement value.
fn sign_extend_16(bits: u32) -> i32 {
    let half = (bits & LOW_HALF) as i32;
    if half >= SIGN_BIT {
        half - HALF_RANGE
    } else {
        half
    }
}

fn cells_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""cells"\s*:\s*(?:PoolIntArray|PackedInt32Array)\s*\(([^)]*)\)"#)
            .expect("cells pattern is valid")
    })
}

/// Find the cell array in `text` and parse its entries.
///
/// Entries are decimal integers, optionally negative, separated by commas.
/// Both the signed and the unsigned spelling of a 32-bit pattern are
/// accepted, so `-1` and `4294967295` yield the same value.
pub fn extract_cell_integers(text: &str) -> Result<Vec<u32>, DecodeError> {
    let captures = cells_pattern().captures(text).ok_or(DecodeError::NotFound)?;
    let body = captures.get(1).map_or("", |m| m.as_str());

    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .enumerate()
        .map(|(index, raw)| parse_entry(index, raw.trim()))
        .collect()
}

fn parse_entry(index: usize, token: &str) -> Result<u32, DecodeError> {
    let value: i64 = token
        .parse()
        .map_err(|_| DecodeError::InvalidInteger { index, token: token.to_string() })?;

    if value < i64::from(i32::MIN) || value > i64::from(u32::MAX) {
        return Err(DecodeError::OutOfRange { index, value });
    }

    // Negative values map onto their two's-complement bit pattern
    Ok((value & i64::from(u32::MAX)) as u32)
}

/// Group a flat integer stream into packed cells.
pub fn pack_triples(ints: &[u32]) -> Result<Vec<PackedCell>, DecodeError> {
    if ints.len() % INTS_PER_CELL != 0 {
        return Err(DecodeError::TruncatedTriple { count: ints.len() });
    }

    Ok(ints
        .chunks_exact(INTS_PER_CELL)
        .map(|triple| PackedCell { position: triple[0], reserved: triple[1], item: triple[2] })
        .collect())
}

/// Decode every cell of a scene document, in stream order.
///
/// Coordinates are returned as stored; see [`crate::normalize::normalize`]
/// to move the origin to the top-left cell.
///
/// # Examples
///
/// ```
/// use gridpaint::cells::{decode_cells, Cell};
///
/// let text = r#"data = { "cells": PoolIntArray( 65536, 0, 5, 131072, 0, 7 ) }"#;
/// let cells = decode_cells(text).unwrap();
/// assert_eq!(cells, vec![Cell::new(0, 1, 5), Cell::new(0, 2, 7)]);
/// ```
pub fn decode_cells(text: &str) -> Result<Vec<Cell>, DecodeError> {
    let ints = extract_cell_integers(text)?;
    let packed = pack_triples(&ints)?;
    Ok(packed.iter().map(PackedCell::decode).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(ints: &str) -> String {
        format!("data = {{\n\"cells\": PoolIntArray( {} )\n}}\n", ints)
    }

    #[test]
    fn test_decode_two_cells() {
        let cells = decode_cells(&doc("65536, 0, 5, 131072, 0, 7")).unwrap();
        assert_eq!(cells, vec![Cell::new(0, 1, 5), Cell::new(0, 2, 7)]);
    }

    #[test]
    fn test_low_half_sign_extends() {
        let cells = decode_cells(&doc("65535, 0, 0")).unwrap();
        assert_eq!(cells, vec![Cell::new(-1, 0, 0)]);
    }

    #[test]
    fn test_negative_position_integer() {
        // -1 is 0xFFFFFFFF: both halves are -1
        let cells = decode_cells(&doc("-1, 0, 2")).unwrap();
        assert_eq!(cells, vec![Cell::new(-1, -1, 2)]);
    }

    #[test]
    fn test_unsigned_spelling_matches_signed() {
        let signed = decode_cells(&doc("-65536, 0, 1")).unwrap();
        let unsigned = decode_cells(&doc("4294901760, 0, 1")).unwrap();
        assert_eq!(signed, unsigned);
        assert_eq!(signed, vec![Cell::new(0, -1, 1)]);
    }

    #[test]
    fn test_color_index_is_unsigned_low_half() {
        // High half of c carries orientation in the editor, it is dropped
        let cells = decode_cells(&doc("0, 0, 1114111")).unwrap();
        assert_eq!(cells[0].color_index, 0xFFFF);

        let cells = decode_cells(&doc("0, 0, -1")).unwrap();
        assert_eq!(cells[0].color_index, 0xFFFF);
    }

    #[test]
    fn test_reserved_integer_is_ignored() {
        let a = decode_cells(&doc("65537, 0, 4")).unwrap();
        let b = decode_cells(&doc("65537, 123456, 4")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reserved_integer_is_kept_on_packed_cell() {
        let packed = pack_triples(&[1, 42, 3]).unwrap();
        assert_eq!(packed[0].reserved, 42);
    }

    #[test]
    fn test_missing_marker() {
        let text = "[gd_scene format=2]\n[node name=\"Painting\" type=\"GridMap\"]\n";
        assert_eq!(decode_cells(text), Err(DecodeError::NotFound));
    }

    #[test]
    fn test_non_numeric_entry() {
        let err = decode_cells(&doc("1, 0, x")).unwrap_err();
        assert_eq!(err, DecodeError::InvalidInteger { index: 2, token: "x".to_string() });
    }

    #[test]
    fn test_count_not_multiple_of_three() {
        let err = decode_cells(&doc("1, 0, 2, 3")).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedTriple { count: 4 });
    }

    #[test]
    fn test_out_of_range_entry() {
        let err = decode_cells(&doc("4294967296, 0, 0")).unwrap_err();
        assert_eq!(err, DecodeError::OutOfRange { index: 0, value: 4294967296 });
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(decode_cells(&doc("")), Ok(vec![]));
        assert_eq!(decode_cells("\"cells\": PoolIntArray()"), Ok(vec![]));
    }

    #[test]
    fn test_godot4_array_spelling() {
        let text = "\"cells\": PackedInt32Array(65536, 0, 5)";
        assert_eq!(decode_cells(text), Ok(vec![Cell::new(0, 1, 5)]));
    }

    #[test]
    fn test_first_marker_wins() {
        let text = format!("{}\n{}", doc("0, 0, 1"), doc("65536, 0, 2"));
        assert_eq!(decode_cells(&text), Ok(vec![Cell::new(0, 0, 1)]));
    }

    #[test]
    fn test_decode_is_repeatable() {
        let text = doc("65536, 0, 5");
        assert_eq!(decode_cells(&text), decode_cells(&text));
    }
}
