//! cvcl - copy an image through an OpenCL kernel, timing each stage
//!
//! This application maps an RGBA image file into memory, uploads it to a
//! GPU image via OpenCL, runs an identity copy kernel over it, downloads
//! the result and prints per-stage wall-clock timings.

mod input;
mod opencl;
mod profile;

use crate::input::MappedImage;
use crate::opencl::{COPY_KERNEL_SOURCE, ClZone, ZoneConfig, list_devices, run_copy};
use crate::profile::print_report;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the image-copy harness
#[derive(Parser, Debug)]
#[clap(
    name = "cvcl",
    about = "Copy an RGBA image through an OpenCL kernel and report per-stage timing.",
    version
)]
struct Args {
    /// Path to the raw RGBA input image
    #[clap(required_unless_present = "list_devices")]
    image: Option<PathBuf>,

    /// Image width in pixels
    #[clap(long, default_value = "720")]
    width: usize,

    /// Image height in pixels
    #[clap(long, default_value = "480")]
    height: usize,

    /// GPU device index to use (0 for first GPU)
    #[clap(short, long, default_value = "0")]
    device: usize,

    /// OpenCL platform index
    #[clap(short, long, default_value = "0")]
    platform: usize,

    /// Write the downloaded target image to this path
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Enable verbose logging
    #[clap(short, long)]
    verbose: bool,

    /// List available OpenCL platforms and devices and exit
    #[clap(long)]
    list_devices: bool,
}

fn main() -> Result<()> {
    // Usage errors exit 1; --help and --version still exit 0.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    if args.list_devices {
        return list_devices();
    }

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let image_path = args.image.context("no image path given")?;

    let mapped = MappedImage::open(&image_path)?;
    let source = mapped.rgba_pixels(args.width, args.height)?;
    log::info!(
        "Mapped {} ({} bytes, using {}x{} RGBA)",
        image_path.display(),
        mapped.len(),
        args.width,
        args.height
    );

    let zone_config = ZoneConfig {
        platform_index: args.platform,
        device_index: args.device,
    };
    let zone = ClZone::new(&zone_config, COPY_KERNEL_SOURCE)?;
    log::info!("Compute zone ready on {}", zone.device_name());

    let output = run_copy(&zone, source, args.width, args.height)?;

    if let Some(path) = &args.output {
        std::fs::write(path, &output.pixels)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote target image to {}", path.display());
    }

    print_report(&output.timings);
    println!("Completed successfully.");
    Ok(())
}
