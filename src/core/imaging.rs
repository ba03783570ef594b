// src/core/imaging.rs
use std::path::Path;

use image::{imageops, DynamicImage, ImageReader, RgbImage};

use crate::errors::{Error, Result};

/// Decode an icon. Icons are stored without extension, so the format is sniffed.
pub fn load_icon(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    reader
        .decode()
        .map_err(|source| Error::Image { path: path.to_path_buf(), source })
}

/// Fit `img` into a black `dim × dim` RGB square.
///
/// The source is placed at `floor((dim - w) / 2), floor((dim - h) / 2)`:
/// smaller sides get symmetric black borders, larger sides are center-cropped.
/// Alpha is dropped, not composited.
pub fn fit_to_square(img: &DynamicImage, dim: u32) -> RgbImage {
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    if w == dim && h == dim {
        return rgb;
    }

    let x = (dim as i64 - w as i64).div_euclid(2);
    let y = (dim as i64 - h as i64).div_euclid(2);

    let mut canvas = RgbImage::new(dim, dim);
    imageops::overlay(&mut canvas, &rgb, x, y);
    canvas
}
