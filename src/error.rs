use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EdgeError>;

#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("raster buffer holds {actual} samples, expected {expected}")]
    SampleCount { expected: usize, actual: usize },

    #[error("raster of {width}x{height}x{channels} samples is too large")]
    TooLarge {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("raster has {channels} channel(s); at least one color channel plus alpha is required")]
    TooFewChannels { channels: usize },

    #[error("kernel must be square with an odd side, got {rows}x{cols}")]
    KernelShape { rows: usize, cols: usize },

    #[error("gaussian radius {0} gives a kernel too large to build")]
    KernelTooLarge(usize),

    #[error("gaussian sigma must be finite and positive, got {0}")]
    InvalidSigma(f64),

    #[error("cannot encode a raster with {0} channels")]
    UnsupportedChannels(usize),

    #[error("failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
