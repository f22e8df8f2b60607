//! img2edges - greyscale, Gaussian blur and gradient-magnitude edge filtering
//!
//! This library turns a color raster into an edge-strength map:
//!
//! ## Stages
//!
//! - **Greyscale**: unweighted mean of the color channels, alpha forced opaque
//! - **Gaussian blur**: normalized 13×13 kernel (sigma 1.9) by default
//! - **Edge magnitude**: horizontal and vertical 3×3 gradients combined as
//!   `sqrt(h^2 + v^2)` and rescaled so the strongest edge is 255
//!
//! Convolution replicates border pixels. Non-maximum suppression and
//! hysteresis thresholding are not part of this crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use img2edges::{process_file, PipelineOptions};
//! use std::path::Path;
//!
//! let options = PipelineOptions {
//!     sigma: 1.4,
//!     ..Default::default()
//! };
//!
//! process_file(Path::new("test.png"), Path::new("result.png"), &options)
//!     .expect("Edge detection failed");
//! ```

pub mod convolution;
pub mod edge_detector;
pub mod error;
pub mod greyscale;
pub mod kernel;
pub mod pipeline;
pub mod raster;
pub mod raster_io;

pub use convolution::convolve;
pub use edge_detector::detect_edges;
pub use error::{EdgeError, Result};
pub use greyscale::to_greyscale;
pub use kernel::{Kernel, KernelCentering};
pub use pipeline::{Pipeline, PipelineOptions};
pub use raster::{ChannelLayout, Raster};
pub use raster_io::{load_raster, save_raster};

/// Run the full filter chain on an image file and write the result.
///
/// # Example
///
/// ```rust,no_run
/// use img2edges::{process_file, PipelineOptions};
/// use std::path::Path;
///
/// process_file(Path::new("in.png"), Path::new("out.png"), &PipelineOptions::default())?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn process_file(
    input_path: &std::path::Path,
    output_path: &std::path::Path,
    options: &PipelineOptions,
) -> Result<()> {
    let pipeline = Pipeline::new(options.clone())?;
    let raster = load_raster(input_path)?;
    let edges = pipeline.run(raster)?;
    save_raster(&edges, output_path)
}
