//! Compute zone: the device, context, command queue and compiled program
//! bundled for the lifetime of the run.

use anyhow::{Context as _, Result, anyhow, bail};
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::{CL_DEVICE_TYPE_GPU, Device, get_device_ids};
use opencl3::kernel::Kernel;
use opencl3::platform::get_platforms;
use opencl3::program::Program;

use super::error::cl_error;

/// Which platform and device the zone is created on.
#[derive(Debug, Clone)]
pub struct ZoneConfig {
    /// OpenCL platform index.
    pub platform_index: usize,
    /// GPU device index within the platform (0 for first GPU).
    pub device_index: usize,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            platform_index: 0,
            device_index: 0,
        }
    }
}

/// Opaque bundle of GPU state: one device, one context, one in-order
/// command queue, and the program built from the embedded kernel source.
pub struct ClZone {
    device: Device,
    context: Context,
    queue: CommandQueue,
    program: Program,
}

impl ClZone {
    /// Select a GPU device, create context and queue, and build `source`.
    pub fn new(config: &ZoneConfig, source: &str) -> Result<Self> {
        let platforms = get_platforms().map_err(|e| cl_error("clGetPlatformIDs", e))?;
        if platforms.is_empty() {
            bail!("no OpenCL platforms found");
        }
        let platform = platforms.get(config.platform_index).with_context(|| {
            format!(
                "platform index {} out of range ({} platforms)",
                config.platform_index,
                platforms.len()
            )
        })?;

        let device_ids = get_device_ids(platform.id(), CL_DEVICE_TYPE_GPU)
            .map_err(|e| cl_error("clGetDeviceIDs", opencl3::error_codes::ClError(e)))?;
        if device_ids.is_empty() {
            bail!(
                "no GPU devices found on platform {}",
                config.platform_index
            );
        }

        let names: Vec<String> = device_ids
            .iter()
            .map(|id| {
                Device::new(*id)
                    .name()
                    .unwrap_or_else(|_| "Unknown Device".to_string())
            })
            .collect();
        log::info!("OpenCL devices: {}", names.join(" "));

        let device_id = *device_ids.get(config.device_index).with_context(|| {
            format!(
                "device index {} out of range ({} GPU devices)",
                config.device_index,
                device_ids.len()
            )
        })?;
        let device = Device::new(device_id);
        log::info!(
            "Using device {}: {}",
            config.device_index,
            device.name().unwrap_or_else(|_| "Unknown Device".to_string())
        );

        let context =
            Context::from_device(&device).map_err(|e| cl_error("clCreateContext", e))?;

        // OpenCL 1.2 queue creation; the 2.0 variant is unavailable on
        // several platforms (notably macOS).
        #[allow(deprecated)]
        let queue = CommandQueue::create_default(&context, 0)
            .map_err(|e| cl_error("clCreateCommandQueue", e))?;

        let program = Program::create_and_build_from_source(&context, source, "")
            .map_err(|build_log| {
                anyhow!("program build failure: {}", build_log.trim())
            })?;
        log::debug!("program built");

        Ok(ClZone {
            device,
            context,
            queue,
            program,
        })
    }

    /// Create a kernel by name from the zone's program.
    pub fn kernel(&self, name: &str) -> Result<Kernel> {
        Kernel::create(&self.program, name).map_err(|e| cl_error("clCreateKernel", e))
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }
}

/// Print available OpenCL platforms and GPU devices to stdout.
pub fn list_devices() -> Result<()> {
    println!("Available OpenCL Platforms and Devices:");
    let platforms = get_platforms().map_err(|e| cl_error("clGetPlatformIDs", e))?;
    if platforms.is_empty() {
        println!("  No OpenCL platforms found.");
        return Ok(());
    }

    for (plat_idx, platform) in platforms.iter().enumerate() {
        let plat_name = platform
            .name()
            .unwrap_or_else(|_| "Unknown Platform".to_string());
        println!("\nPlatform {}: {}", plat_idx, plat_name);

        match get_device_ids(platform.id(), CL_DEVICE_TYPE_GPU) {
            Ok(device_ids) => {
                if device_ids.is_empty() {
                    println!("  No GPU devices found on this platform.");
                } else {
                    for (dev_idx, device_id) in device_ids.iter().enumerate() {
                        let device = Device::new(*device_id);
                        let dev_name = device
                            .name()
                            .unwrap_or_else(|_| "Unknown Device".to_string());
                        let dev_vendor = device
                            .vendor()
                            .unwrap_or_else(|_| "Unknown Vendor".to_string());
                        let dev_mem = device.global_mem_size().unwrap_or(0);
                        println!(
                            "  Device {}: {} ({}) - Memory: {} MB",
                            dev_idx,
                            dev_name,
                            dev_vendor,
                            dev_mem / (1024 * 1024)
                        );
                    }
                }
            }
            Err(e) => {
                println!("  Error getting devices for this platform: {}", e);
            }
        }
    }
    Ok(())
}
