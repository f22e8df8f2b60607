//! Colour-to-grey conversion that keeps the channel count.

use crate::error::Result;
use crate::raster::{OPAQUE, Raster};

/// Replace every color channel with the unweighted mean of the color
/// channels and force alpha to opaque.
pub fn to_greyscale(raster: &Raster, parallel: bool) -> Result<Raster> {
    let layout = raster.layout()?;
    let colors = layout.color_channels();
    let channels = raster.channels();
    let mut out = raster.zeros_like();

    out.fill_columns(parallel, |x, column| {
        let src = raster.column(x);
        for (pixel, dst) in src.chunks(channels).zip(column.chunks_mut(channels)) {
            let luminance: f64 = pixel[..colors].iter().map(|v| v / colors as f64).sum();
            dst[..colors].fill(luminance);
            dst[layout.alpha()] = OPAQUE;
        }
    });

    Ok(out)
}
