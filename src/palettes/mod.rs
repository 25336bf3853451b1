//! Built-in palette definitions.
//!
//! These palettes are always present in the registry, so a scene whose mesh
//! library is named e.g. `pico8.meshlib` renders without any configuration.
//! Configured palettes with the same name replace them.

use crate::models::Palette;

/// List of all available built-in palette names.
const BUILTIN_NAMES: &[&str] = &["gameboy", "nes", "pico8", "grayscale", "1bit"];

/// Returns a list of all available built-in palette names.
pub fn list_builtins() -> Vec<&'static str> {
    BUILTIN_NAMES.to_vec()
}

/// Returns a built-in palette by name, or None if not found.
pub fn get_builtin(name: &str) -> Option<Palette> {
    let colors: &[[u8; 4]] = match name {
        "gameboy" => GAMEBOY,
        "nes" => NES,
        "pico8" => PICO8,
        "grayscale" => GRAYSCALE,
        "1bit" => ONE_BIT,
        _ => return None,
    };
    Some(Palette::from_rgba(name, colors))
}

/// Game Boy 4-color green palette, lightest first.
/// Reference: https://lospec.com/palette-list/nintendo-gameboy-bgb
const GAMEBOY: &[[u8; 4]] = &[
    [0x9B, 0xBC, 0x0F, 255],
    [0x8B, 0xAC, 0x0F, 255],
    [0x30, 0x62, 0x30, 255],
    [0x0F, 0x38, 0x0F, 255],
];

/// NES-inspired palette with key representative colors.
/// Reference: https://lospec.com/palette-list/nintendo-entertainment-system
const NES: &[[u8; 4]] = &[
    [0x00, 0x00, 0x00, 255],
    [0xFC, 0xFC, 0xFC, 255],
    [0xA8, 0x00, 0x20, 255],
    [0x00, 0xA8, 0x00, 255],
    [0x00, 0x58, 0xF8, 255],
    [0x00, 0xB8, 0xD8, 255],
    [0xF8, 0xD8, 0x00, 255],
    [0xF8, 0x38, 0x00, 255],
    [0xF8, 0x78, 0xF8, 255],
    [0x50, 0x30, 0x00, 255],
    [0x7C, 0x7C, 0x7C, 255],
    [0xFC, 0xB8, 0xB8, 255],
];

/// PICO-8 16-color palette in its canonical index order.
/// Reference: https://lospec.com/palette-list/pico-8
const PICO8: &[[u8; 4]] = &[
    [0x00, 0x00, 0x00, 255],
    [0x1D, 0x2B, 0x53, 255],
    [0x7E, 0x25, 0x53, 255],
    [0x00, 0x87, 0x51, 255],
    [0xAB, 0x52, 0x36, 255],
    [0x5F, 0x57, 0x4F, 255],
    [0xC2, 0xC3, 0xC7, 255],
    [0xFF, 0xF1, 0xE8, 255],
    [0xFF, 0x00, 0x4D, 255],
    [0xFF, 0xA3, 0x00, 255],
    [0xFF, 0xEC, 0x27, 255],
    [0x00, 0xE4, 0x36, 255],
    [0x29, 0xAD, 0xFF, 255],
    [0x83, 0x76, 0x9C, 255],
    [0xFF, 0x77, 0xA8, 255],
    [0xFF, 0xCC, 0xAA, 255],
];

/// 8-shade grayscale palette from white to black.
const GRAYSCALE: &[[u8; 4]] = &[
    [0xFF, 0xFF, 0xFF, 255],
    [0xDF, 0xDF, 0xDF, 255],
    [0xBF, 0xBF, 0xBF, 255],
    [0x9F, 0x9F, 0x9F, 255],
    [0x7F, 0x7F, 0x7F, 255],
    [0x5F, 0x5F, 0x5F, 255],
    [0x3F, 0x3F, 0x3F, 255],
    [0x00, 0x00, 0x00, 255],
];

/// 1-bit black and white palette.
const ONE_BIT: &[[u8; 4]] = &[[0x00, 0x00, 0x00, 255], [0xFF, 0xFF, 0xFF, 255]];
