//! Decoding images into rasters and encoding rasters back to image files.

use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use std::path::Path;

use crate::error::{EdgeError, Result};
use crate::raster::Raster;

pub fn load_raster(path: &Path) -> Result<Raster> {
    let img = image::open(path).map_err(|source| EdgeError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Raster::from_rgba_image(&img.to_rgba8())
}

pub fn save_raster(raster: &Raster, path: &Path) -> Result<()> {
    raster
        .to_dynamic_image()?
        .save(path)
        .map_err(|source| EdgeError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Round and clamp a working sample into the 8-bit display range.
#[inline]
pub fn to_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl Raster {
    pub fn from_rgba_image(img: &RgbaImage) -> Result<Raster> {
        Raster::from_fn(img.width() as usize, img.height() as usize, 4, |x, y, c| {
            img.get_pixel(x as u32, y as u32).0[c] as f64
        })
    }

    /// Row-major 8-bit buffer in the order image codecs expect.
    pub fn to_interleaved_u8(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.data().len());
        for y in 0..self.height() {
            for x in 0..self.width() {
                for c in 0..self.channels() {
                    buf.push(to_u8(self.get(x, y, c)));
                }
            }
        }
        buf
    }

    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let too_large = || EdgeError::TooLarge {
            width: self.width(),
            height: self.height(),
            channels: self.channels(),
        };
        let w = u32::try_from(self.width()).map_err(|_| too_large())?;
        let h = u32::try_from(self.height()).map_err(|_| too_large())?;
        let buf = self.to_interleaved_u8();
        let img = match self.channels() {
            1 => GrayImage::from_raw(w, h, buf).map(DynamicImage::ImageLuma8),
            2 => GrayAlphaImage::from_raw(w, h, buf).map(DynamicImage::ImageLumaA8),
            3 => RgbImage::from_raw(w, h, buf).map(DynamicImage::ImageRgb8),
            4 => RgbaImage::from_raw(w, h, buf).map(DynamicImage::ImageRgba8),
            n => return Err(EdgeError::UnsupportedChannels(n)),
        };
        img.ok_or_else(too_large)
    }
}
