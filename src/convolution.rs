//! 2D convolution over every channel of a raster with edge-replicated borders.

use crate::kernel::{Kernel, KernelCentering};
use crate::raster::Raster;

/// Round to the nearest integer, ties toward positive infinity.
#[inline]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Weighted sum of the kernel footprint around `(x, y)` in one channel.
#[inline]
fn accumulate(raster: &Raster, kernel: &Kernel, mid: isize, x: usize, y: usize, channel: usize) -> f64 {
    let side = kernel.side();
    let mut acc = 0.0;
    for row in 0..side {
        let sy = y as isize + row as isize - mid;
        for col in 0..side {
            let sx = x as isize + col as isize - mid;
            acc += kernel.at(row, col) * raster.sample(sx, sy, channel);
        }
    }
    acc
}

/// Convolve every sample, alpha included, and round the result.
///
/// The output has the same shape as `raster`. Tap `(row, col)` reads the
/// input at `(x + col - mid, y + row - mid)` with `mid` picked by `centering`.
pub fn convolve(raster: &Raster, kernel: &Kernel, centering: KernelCentering, parallel: bool) -> Raster {
    let mid = centering.mid(kernel.side());
    let channels = raster.channels();
    let mut out = raster.zeros_like();

    out.fill_columns(parallel, |x, column| {
        for (i, slot) in column.iter_mut().enumerate() {
            let y = i / channels;
            let channel = i % channels;
            *slot = round_half_up(accumulate(raster, kernel, mid, x, y, channel));
        }
    });

    out
}
