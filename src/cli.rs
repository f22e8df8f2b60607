use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "img2edges")]
#[command(about = "Greyscale, Gaussian blur and gradient-magnitude edge detection")]
#[command(version)]
pub struct Cli {
    /// Input image file
    #[arg(short, long, default_value = "test.png")]
    pub input: PathBuf,

    /// Output image file
    #[arg(short, long, default_value = "result.png")]
    pub output: PathBuf,

    /// JSON file with pipeline options; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Gaussian sigma (default: 1.9)
    #[arg(short, long)]
    pub sigma: Option<f64>,

    /// Gaussian radius, kernel side is 2*radius+1 (default: 6)
    #[arg(short, long)]
    pub radius: Option<usize>,

    /// Offset kernel taps by one extra pixel to reproduce historical output
    #[arg(long)]
    pub legacy_centering: bool,

    /// Disable multithreading
    #[arg(long)]
    pub sequential: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["img2edges"]);
        assert_eq!(cli.input, PathBuf::from("test.png"));
        assert_eq!(cli.output, PathBuf::from("result.png"));
        assert!(cli.sigma.is_none());
        assert!(!cli.legacy_centering);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "img2edges", "-i", "a.png", "-o", "b.png", "-s", "2.5", "-r", "3",
            "--legacy-centering", "--sequential", "-vv",
        ]);
        assert_eq!(cli.sigma, Some(2.5));
        assert_eq!(cli.radius, Some(3));
        assert!(cli.legacy_centering);
        assert!(cli.sequential);
        assert_eq!(cli.verbose, 2);
    }
}
