use image::{Rgba, RgbaImage, imageops};

use crate::error::Error;
use crate::model::{PixelRect, SourceBitmap};

/// Copy `rect` out of `bitmap` onto an opaque `background` canvas.
///
/// Source pixels are alpha-blended over the background, so the result has no
/// transparent pixels. A rectangle reaching outside the bitmap is rejected
/// rather than clamped.
pub fn slice(
    bitmap: &SourceBitmap,
    rect: PixelRect,
    background: [u8; 3],
) -> Result<SourceBitmap, Error> {
    if !rect.fits_within(bitmap.width(), bitmap.height()) {
        return Err(Error::Geometry {
            rect,
            width: bitmap.width(),
            height: bitmap.height(),
        });
    }

    let [r, g, b] = background;
    let mut canvas = RgbaImage::from_pixel(rect.w, rect.h, Rgba([r, g, b, 255]));
    let region = imageops::crop_imm(bitmap.pixels(), rect.x, rect.y, rect.w, rect.h).to_image();
    imageops::overlay(&mut canvas, &region, 0, 0);
    Ok(SourceBitmap::new(canvas))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(width: u32, height: u32) -> SourceBitmap {
        // each row's red channel holds its y coordinate
        let img = RgbaImage::from_fn(width, height, |_, y| Rgba([y as u8, 0, 0, 255]));
        SourceBitmap::new(img)
    }

    #[test]
    fn copies_requested_rows() {
        let src = striped(4, 10);
        let out = slice(&src, PixelRect::new(0, 3, 4, 5), [255, 255, 255]).unwrap();
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 5);
        assert_eq!(out.pixels().get_pixel(0, 0).0, [3, 0, 0, 255]);
        assert_eq!(out.pixels().get_pixel(3, 4).0, [7, 0, 0, 255]);
    }

    #[test]
    fn transparent_pixels_become_background() {
        let src = SourceBitmap::new(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let out = slice(&src, src.full_rect(), [250, 240, 230]).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0 == [250, 240, 230, 255]));
    }

    #[test]
    fn out_of_range_is_geometry_error() {
        let src = striped(4, 10);
        let err = slice(&src, PixelRect::new(0, 8, 4, 3), [255, 255, 255]).unwrap_err();
        assert!(matches!(err, Error::Geometry { width: 4, height: 10, .. }));
        assert!(slice(&src, PixelRect::new(1, 0, 4, 1), [255, 255, 255]).is_err());
    }
}
