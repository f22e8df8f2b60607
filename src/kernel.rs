//! Square convolution kernels and the Gaussian generator.

use serde::{Deserialize, Serialize};

use crate::error::{EdgeError, Result};

/// How a kernel cell `(row, col)` maps onto the sampled pixel offset
/// `(col - mid, row - mid)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelCentering {
    /// `mid = side / 2`: the middle cell sits over the output pixel.
    #[default]
    Standard,
    /// `mid = side / 2 + 1`: every tap reads one pixel further up and left,
    /// shifting the result one pixel toward higher x and y.
    Shifted,
}

impl KernelCentering {
    pub fn mid(self, side: usize) -> isize {
        let half = (side / 2) as isize;
        match self {
            KernelCentering::Standard => half,
            KernelCentering::Shifted => half + 1,
        }
    }
}

/// Square, odd-sided weight grid stored row-major in one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f64>,
}

/// Horizontal gradient: responds to intensity change along x.
pub const GRADIENT_X: [[f64; 3]; 3] = [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]];

/// Vertical gradient: responds to intensity change along y.
pub const GRADIENT_Y: [[f64; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

impl Kernel {
    pub fn new(side: usize, weights: Vec<f64>) -> Result<Self> {
        if side % 2 == 0 || side.checked_mul(side) != Some(weights.len()) {
            return Err(EdgeError::KernelShape {
                rows: side,
                cols: if side == 0 { weights.len() } else { weights.len() / side },
            });
        }
        Ok(Self { side, weights })
    }

    /// Build from nested rows; every row must be as long as there are rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let side = rows.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != side) {
            return Err(EdgeError::KernelShape {
                rows: side,
                cols: bad.len(),
            });
        }
        Self::new(side, rows.iter().flatten().copied().collect())
    }

    pub fn from_array<const N: usize>(rows: [[f64; N]; N]) -> Result<Self> {
        Self::new(N, rows.iter().flatten().copied().collect())
    }

    pub fn gradient_x() -> Self {
        Self {
            side: 3,
            weights: GRADIENT_X.iter().flatten().copied().collect(),
        }
    }

    pub fn gradient_y() -> Self {
        Self {
            side: 3,
            weights: GRADIENT_Y.iter().flatten().copied().collect(),
        }
    }

    /// Normalized Gaussian of side `2 * radius + 1`.
    ///
    /// Cell `(i, j)` is evaluated with 1-based coordinates measured against
    /// `radius`, i.e. `g(i + 1 - radius, j + 1 - radius)` for 0-based `i, j`.
    /// For `radius >= 1` the peak lands on cell `(radius - 1, radius - 1)`;
    /// for `radius == 0` the single cell sits at offset `(1, 1)`. Weights are
    /// then divided by their mean over the cell count so they sum to 1.
    ///
    /// The `1 / (2 pi sigma^2)` factor cancels in the normalization and is left
    /// out. Exponents are taken relative to the smallest squared offset so the
    /// closest cell always weighs exactly 1 before normalizing, whatever sigma.
    pub fn gaussian(sigma: f64, radius: usize) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(EdgeError::InvalidSigma(sigma));
        }

        let too_large = || EdgeError::KernelTooLarge(radius);
        let side = radius
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .ok_or_else(too_large)?;
        let len = side.checked_mul(side).ok_or_else(too_large)?;
        let mut weights = Vec::new();
        weights.try_reserve_exact(len).map_err(|_| too_large())?;

        let cells = len as f64;
        let r = radius as f64;
        let min_sq = if radius == 0 { 2.0 } else { 0.0 };

        let mut avg = 0.0;
        for row in 0..side {
            let di = (row + 1) as f64 - r;
            for col in 0..side {
                let dj = (col + 1) as f64 - r;
                // Divide by sigma twice: sigma * sigma can overflow or vanish.
                let exponent = (di * di + dj * dj - min_sq) / sigma / sigma / 2.0;
                let val = (-exponent).exp();
                avg += val / cells;
                weights.push(val);
            }
        }

        for w in &mut weights {
            *w = *w / avg / cells;
        }

        Ok(Self { side, weights })
    }

    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.side + col]
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_default_is_13x13() {
        let k = Kernel::gaussian(1.9, 6).unwrap();
        assert_eq!(k.side(), 13);
        assert_eq!(k.weights().len(), 169);
    }

    #[test]
    fn test_gaussian_sums_to_one() {
        for &(sigma, radius) in &[
            (1.9, 6),
            (0.3, 0),
            (0.02, 0),
            (0.5, 1),
            (4.0, 3),
            (10.0, 10),
            (1e160, 2),
            (1e-170, 2),
            (f64::MIN_POSITIVE, 1),
            (f64::MAX, 0),
        ] {
            let k = Kernel::gaussian(sigma, radius).unwrap();
            assert!(
                (k.sum() - 1.0).abs() < 1e-6,
                "sigma={sigma} radius={radius} sum={}",
                k.sum()
            );
        }
    }

    #[test]
    fn test_gaussian_peak_uses_one_based_offset() {
        let k = Kernel::gaussian(1.9, 6).unwrap();
        let peak = k.at(5, 5);
        for row in 0..13 {
            for col in 0..13 {
                assert!(k.at(row, col) <= peak);
            }
        }
        assert!(k.at(5, 5) > k.at(6, 6));
        assert!((k.at(4, 5) - k.at(6, 5)).abs() < 1e-12);
    }

    #[test]
    fn test_gaussian_extreme_sigma_is_finite() {
        // A vanishing sigma collapses onto the nearest cell.
        let sharp = Kernel::gaussian(1e-170, 2).unwrap();
        assert!((sharp.at(1, 1) - 1.0).abs() < 1e-12);
        assert!(sharp.weights().iter().all(|w| w.is_finite()));
        assert_eq!(sharp.at(2, 2), 0.0);
        // A huge sigma flattens into a box filter.
        let flat = Kernel::gaussian(1e160, 2).unwrap();
        assert!(flat.weights().iter().all(|&w| (w - 1.0 / 25.0).abs() < 1e-12));
        // Radius 0 is a single unit weight regardless of sigma.
        assert_eq!(Kernel::gaussian(0.02, 0).unwrap().weights(), &[1.0]);
    }

    #[test]
    fn test_gaussian_rejects_absurd_radius() {
        for radius in [5_000_000_000, usize::MAX / 2, usize::MAX] {
            assert!(matches!(
                Kernel::gaussian(1.9, radius),
                Err(EdgeError::KernelTooLarge(r)) if r == radius
            ));
        }
    }

    #[test]
    fn test_gaussian_rejects_bad_sigma() {
        assert!(matches!(
            Kernel::gaussian(0.0, 2),
            Err(EdgeError::InvalidSigma(_))
        ));
        assert!(Kernel::gaussian(f64::NAN, 2).is_err());
        assert!(Kernel::gaussian(-1.0, 2).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_and_even() {
        assert!(Kernel::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).is_err());
        assert!(Kernel::from_rows(&[vec![1.0, 0.0, 0.0], vec![0.0], vec![0.0, 0.0, 1.0]]).is_err());
        assert!(Kernel::from_rows(&[]).is_err());
        let k = Kernel::from_rows(&[vec![0.0, 1.0, 0.0], vec![1.0, 2.0, 1.0], vec![0.0, 1.0, 0.0]])
            .unwrap();
        assert_eq!(k.at(1, 1), 2.0);
    }

    #[test]
    fn test_gradient_kernels_are_zero_sum() {
        assert_eq!(Kernel::gradient_x().sum(), 0.0);
        assert_eq!(Kernel::gradient_y().sum(), 0.0);
        assert_eq!(Kernel::gradient_x().at(1, 0), 2.0);
        assert_eq!(Kernel::gradient_y().at(2, 1), -2.0);
    }

    #[test]
    fn test_centering_mid() {
        assert_eq!(KernelCentering::Standard.mid(3), 1);
        assert_eq!(KernelCentering::Shifted.mid(3), 2);
        assert_eq!(KernelCentering::Standard.mid(13), 6);
        assert_eq!(KernelCentering::Shifted.mid(13), 7);
    }
}
