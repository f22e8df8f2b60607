//! Gradient-magnitude edge detection.
//!
//! Convolves the image with a horizontal and a vertical 3×3 gradient kernel,
//! combines them into `sqrt(h^2 + v^2)` per color sample, then rescales so the
//! strongest response becomes 255. There is no non-maximum suppression or
//! hysteresis; the output is the normalized magnitude map.

use log::{debug, warn};
use rayon::prelude::*;

use crate::convolution::convolve;
use crate::error::Result;
use crate::kernel::{Kernel, KernelCentering};
use crate::raster::{ChannelLayout, OPAQUE, Raster};

/// Top of the display range the magnitudes are rescaled into.
pub const DISPLAY_MAX: f64 = 255.0;

/// Detect edges in `raster`, returning a normalized magnitude map of the same
/// shape with an opaque alpha channel.
pub fn detect_edges(raster: &Raster, centering: KernelCentering, parallel: bool) -> Result<Raster> {
    let layout = raster.layout()?;

    let h = convolve(raster, &Kernel::gradient_x(), centering, parallel);
    let v = convolve(raster, &Kernel::gradient_y(), centering, parallel);

    let magnitude = gradient_magnitude(&h, &v, layout, parallel);
    let max = max_magnitude(&magnitude, layout, parallel);
    debug!("edge max magnitude {max}");

    Ok(rescale(&magnitude, max, layout, parallel))
}

/// `sqrt(h^2 + v^2)` per color sample; alpha forced to opaque.
pub fn gradient_magnitude(h: &Raster, v: &Raster, layout: ChannelLayout, parallel: bool) -> Raster {
    let channels = layout.channels();
    let mut out = h.zeros_like();

    out.fill_columns(parallel, |x, column| {
        let hc = h.column(x);
        let vc = v.column(x);
        for (i, slot) in column.iter_mut().enumerate() {
            *slot = if layout.is_alpha(i % channels) {
                OPAQUE
            } else {
                (hc[i] * hc[i] + vc[i] * vc[i]).sqrt()
            };
        }
    });

    out
}

/// Largest color sample over the whole raster. Each column yields a partial
/// maximum and the partials are reduced once every column is done.
pub fn max_magnitude(magnitude: &Raster, layout: ChannelLayout, parallel: bool) -> f64 {
    if magnitude.is_empty() {
        return 0.0;
    }
    let channels = layout.channels();
    let column_max = |col: &[f64]| {
        col.iter()
            .enumerate()
            .filter(|(i, _)| !layout.is_alpha(i % channels))
            .fold(0.0_f64, |acc, (_, &m)| acc.max(m))
    };

    let stride = magnitude.column_len();
    if parallel {
        magnitude
            .data()
            .par_chunks(stride)
            .map(column_max)
            .reduce(|| 0.0, f64::max)
    } else {
        magnitude.data().chunks(stride).map(column_max).fold(0.0, f64::max)
    }
}

/// Map `[0, max]` onto `[0, DISPLAY_MAX]` for color samples. A zero maximum
/// means there are no edges at all, and every color sample becomes 0.
pub fn rescale(magnitude: &Raster, max: f64, layout: ChannelLayout, parallel: bool) -> Raster {
    let channels = layout.channels();
    if max <= 0.0 {
        warn!("uniform input, no gradient to normalize");
    }

    let mut out = magnitude.zeros_like();
    out.fill_columns(parallel, |x, column| {
        let src = magnitude.column(x);
        for (i, slot) in column.iter_mut().enumerate() {
            *slot = if layout.is_alpha(i % channels) {
                src[i]
            } else if max > 0.0 {
                src[i] / max * DISPLAY_MAX
            } else {
                0.0
            };
        }
    });

    out
}
