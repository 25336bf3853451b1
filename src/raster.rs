//! Rasterization of compositions into RGBA images

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::compositor::{Composition, FillColor};

/// Largest canvas, in pixels, the rasterizer will allocate.
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// Transparent color used for the default background
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error when rasterizing a composition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RasterError {
    /// Canvas exceeds [`MAX_PIXELS`]
    #[error("canvas {width}x{height} exceeds the {max} pixel limit")]
    TooLarge { width: u32, height: u32, max: u64 },
    /// A dimension does not fit in `u32`
    #[error("canvas dimensions overflow")]
    DimensionOverflow,
}

/// Check a canvas size against [`MAX_PIXELS`] before allocating it.
pub fn check_canvas(width: u64, height: u64) -> Result<(u32, u32), RasterError> {
    let w = u32::try_from(width).map_err(|_| RasterError::DimensionOverflow)?;
    let h = u32::try_from(height).map_err(|_| RasterError::DimensionOverflow)?;
    if width * height > MAX_PIXELS {
        return Err(RasterError::TooLarge { width: w, height: h, max: MAX_PIXELS });
    }
    Ok((w, h))
}

/// Rasterize onto a transparent canvas.
pub fn rasterize(composition: &Composition) -> Result<RgbaImage, RasterError> {
    rasterize_onto(composition, TRANSPARENT)
}

/// Rasterize onto a canvas filled with `background`.
///
/// Fills are painted in order with source-over blending, so overlapping
/// translucent cells accumulate.
pub fn rasterize_onto(composition: &Composition, background: Rgba<u8>) -> Result<RgbaImage, RasterError> {
    let (width, height) = composition.pixel_size();
    check_canvas(u64::from(width), u64::from(height))?;

    let mut canvas = RgbaImage::from_pixel(width, height, background);
    for fill in &composition.fills {
        fill_rect(&mut canvas, fill.x, fill.y, fill.size, fill.color);
    }
    Ok(canvas)
}

/// Fill a square, clipped to the canvas.
fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, size: u32, color: FillColor) {
    if color.opacity <= 0.0 {
        return;
    }

    let x_end = x.saturating_add(size).min(canvas.width());
    let y_end = y.saturating_add(size).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            let dst = *canvas.get_pixel(px, py);
            canvas.put_pixel(px, py, blend_over(color, dst));
        }
    }
}

/// Porter-Duff "source over" of a fill color onto a pixel.
pub(crate) fn blend_over(src: FillColor, dst: Rgba<u8>) -> Rgba<u8> {
    let src_alpha = src.opacity.clamp(0.0, 1.0);
    let dst_alpha = f32::from(dst[3]) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    if out_alpha == 0.0 {
        return TRANSPARENT;
    }

    let channel = |s: u8, d: u8| -> u8 {
        let s = f32::from(s) / 255.0;
        let d = f32::from(d) / 255.0;
        let out = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (out.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        channel(src.r, dst[0]),
        channel(src.g, dst[1]),
        channel(src.b, dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}
