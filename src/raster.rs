//! Dense multi-channel raster with an x-major sample layout.
//!
//! Samples are stored with `x` varying slowest, then `y`, then the channel:
//! `index = x * (height * channels) + y * channels + channel`. Every x-column
//! is therefore one contiguous `height * channels` chunk, which is what the
//! filters split on when they run in parallel.

use rayon::prelude::*;

use crate::error::{EdgeError, Result};

/// Channel layout shared by the greyscale and edge stages: the color channels
/// come first and the last channel is alpha, fully opaque at [`OPAQUE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    channels: usize,
}

/// Alpha value written by stages that force full opacity.
pub const OPAQUE: f64 = 255.0;

impl ChannelLayout {
    pub fn color_with_alpha(channels: usize) -> Result<Self> {
        if channels < 2 {
            return Err(EdgeError::TooFewChannels { channels });
        }
        Ok(Self { channels })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn color_channels(&self) -> usize {
        self.channels - 1
    }

    pub fn alpha(&self) -> usize {
        self.channels - 1
    }

    pub fn is_alpha(&self, channel: usize) -> bool {
        channel == self.alpha()
    }
}

/// Shape is fixed at construction; `data.len() == width * height * channels`
/// always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f64>,
}

/// `width * height * channels`, or an error when it does not fit in `usize`.
pub fn sample_count(width: usize, height: usize, channels: usize) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(EdgeError::TooLarge {
            width,
            height,
            channels,
        })
}

impl Raster {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f64>) -> Result<Self> {
        let expected = sample_count(width, height, channels)?;
        if data.len() != expected {
            return Err(EdgeError::SampleCount {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn zeros(width: usize, height: usize, channels: usize) -> Result<Self> {
        let len = sample_count(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| EdgeError::TooLarge {
            width,
            height,
            channels,
        })?;
        data.resize(len, 0.0);
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Fresh zeroed raster with the same shape as `self`.
    pub fn zeros_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: vec![0.0; self.data.len()],
        }
    }

    /// Build a raster by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, usize) -> f64,
    ) -> Result<Self> {
        let len = sample_count(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| EdgeError::TooLarge {
            width,
            height,
            channels,
        })?;
        for x in 0..width {
            for y in 0..height {
                for c in 0..channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn same_shape(&self, other: &Raster) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    pub fn layout(&self) -> Result<ChannelLayout> {
        ChannelLayout::color_with_alpha(self.channels)
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, channel: usize) -> usize {
        x * (self.height * self.channels) + y * self.channels + channel
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> f64 {
        self.data[self.index(x, y, channel)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: f64) {
        let idx = self.index(x, y, channel);
        self.data[idx] = value;
    }

    /// Edge-replicating lookup: `x` and `y` are clamped into the raster before
    /// indexing. `channel` is not clamped and must be valid.
    #[inline]
    pub fn sample(&self, x: isize, y: isize, channel: usize) -> f64 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.get(cx, cy, channel)
    }

    /// Samples of one x-column, `height * channels` long.
    pub fn column(&self, x: usize) -> &[f64] {
        let stride = self.column_len();
        &self.data[x * stride..(x + 1) * stride]
    }

    pub fn column_len(&self) -> usize {
        self.height * self.channels
    }

    /// Run `f(x, column)` over every x-column of the buffer, on the rayon pool
    /// when `parallel` is set. Columns never overlap, so no locking is needed.
    pub fn fill_columns<F>(&mut self, parallel: bool, f: F)
    where
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        if self.data.is_empty() {
            return;
        }
        let stride = self.column_len();
        if parallel {
            self.data
                .par_chunks_mut(stride)
                .enumerate()
                .for_each(|(x, col)| f(x, col));
        } else {
            self.data
                .chunks_mut(stride)
                .enumerate()
                .for_each(|(x, col)| f(x, col));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize, channels: usize) -> Raster {
        Raster::from_fn(width, height, channels, |x, y, c| {
            (x * 100 + y * 10 + c) as f64
        })
        .unwrap()
    }

    #[test]
    fn test_layout_is_x_major_channel_fastest() {
        let r = ramp(3, 2, 4);
        assert_eq!(r.index(0, 0, 1), 1);
        assert_eq!(r.index(0, 1, 0), 4);
        assert_eq!(r.index(1, 0, 0), 8);
        assert_eq!(r.data()[r.index(2, 1, 3)], 213.0);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Raster::new(2, 2, 4, vec![0.0; 15]).unwrap_err();
        assert!(matches!(
            err,
            EdgeError::SampleCount {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_sample_clamps_out_of_range_coordinates() {
        let r = ramp(4, 3, 2);
        for x in -5isize..10 {
            for y in -5isize..10 {
                let cx = x.clamp(0, 3) as usize;
                let cy = y.clamp(0, 2) as usize;
                for c in 0..2 {
                    assert_eq!(r.sample(x, y, c), r.get(cx, cy, c));
                }
            }
        }
    }

    #[test]
    fn test_column_slices_one_x() {
        let r = ramp(3, 2, 2);
        assert_eq!(r.column(1), &[100.0, 101.0, 110.0, 111.0]);
    }

    #[test]
    fn test_oversized_shape_is_rejected() {
        let huge = usize::MAX / 2;
        assert!(matches!(
            Raster::zeros(huge, 3, 4),
            Err(EdgeError::TooLarge { .. })
        ));
        assert!(matches!(
            Raster::from_fn(huge, huge, 1, |_, _, _| 0.0),
            Err(EdgeError::TooLarge { .. })
        ));
        assert!(matches!(
            Raster::new(huge, 4, 4, Vec::new()),
            Err(EdgeError::TooLarge { .. })
        ));
        // Fits in usize but cannot be allocated.
        assert!(Raster::zeros(1 << 31, 1 << 31, 1).is_err());
    }

    #[test]
    fn test_shape_accessors_match_buffer() {
        let r = Raster::zeros(3, 2, 4).unwrap();
        assert_eq!((r.width(), r.height(), r.channels()), (3, 2, 4));
        assert_eq!(r.data().len(), 24);
        let blank = r.zeros_like();
        assert!(blank.same_shape(&r));
        assert_eq!(blank.data().len(), 24);
    }

    #[test]
    fn test_channel_layout_requires_alpha() {
        assert!(ChannelLayout::color_with_alpha(1).is_err());
        let layout = ChannelLayout::color_with_alpha(4).unwrap();
        assert_eq!(layout.color_channels(), 3);
        assert!(layout.is_alpha(3));
        assert!(!layout.is_alpha(2));
        assert_eq!(layout.channels(), 4);
    }
}
