//! The image-copy dispatch: two 2D RGBA images, one kernel, three timed
//! stages (upload, execute, download).

use anyhow::Result;
use opencl3::kernel::ExecuteKernel;
use opencl3::memory::{
    CL_MEM_OBJECT_IMAGE2D, CL_MEM_READ_ONLY, CL_MEM_WRITE_ONLY, CL_RGBA, CL_UNORM_INT8, Image,
    cl_image_desc, cl_image_format,
};
use opencl3::types::{CL_BLOCKING, cl_int};
use std::ffi::c_void;
use std::ptr;

use super::error::cl_error;
use super::zone::ClZone;
use crate::input::RGBA_BYTES_PER_PIXEL;
use crate::profile::{StageTiming, Stopwatch};

/// OpenCL source for the identity copy kernel.
pub const COPY_KERNEL_SOURCE: &str = include_str!("../../kernels/copy.cl");

/// Kernel entry point name in `copy.cl`.
pub const COPY_KERNEL_NAME: &str = "copy";

/// Work-group size for the 2D dispatch.
pub const LOCAL_WORK_SIZE: [usize; 2] = [16, 16];

/// Result of one copy run: the downloaded pixels and the stage timings.
pub struct CopyOutput {
    pub pixels: Vec<u8>,
    pub timings: Vec<StageTiming>,
}

/// Round `value` up to the next multiple of `multiple`.
fn round_up(value: usize, multiple: usize) -> usize {
    value.div_ceil(multiple) * multiple
}

/// Global work size covering a `width` x `height` image with
/// [`LOCAL_WORK_SIZE`] work-groups. The kernel bounds-checks the overhang.
pub fn global_work_size(width: usize, height: usize) -> [usize; 2] {
    [
        round_up(width, LOCAL_WORK_SIZE[0]),
        round_up(height, LOCAL_WORK_SIZE[1]),
    ]
}

fn rgba_format() -> cl_image_format {
    cl_image_format {
        image_channel_order: CL_RGBA,
        image_channel_data_type: CL_UNORM_INT8,
    }
}

fn image2d_desc(width: usize, height: usize) -> cl_image_desc {
    cl_image_desc {
        image_type: CL_MEM_OBJECT_IMAGE2D,
        image_width: width,
        image_height: height,
        image_depth: 1,
        image_array_size: 1,
        image_row_pitch: 0,
        image_slice_pitch: 0,
        num_mip_levels: 0,
        num_samples: 0,
        buffer: ptr::null_mut(),
    }
}

/// Upload `source` into a read-only image, run the copy kernel over the
/// full grid, and download the target image.
///
/// Every enqueue is blocking; the three stages are timed individually and
/// returned in pipeline order ("write image", "kernel", "read image").
pub fn run_copy(zone: &ClZone, source: &[u8], width: usize, height: usize) -> Result<CopyOutput> {
    let kernel = zone.kernel(COPY_KERNEL_NAME)?;

    let format = rgba_format();
    let desc = image2d_desc(width, height);

    let mut source_image = unsafe {
        Image::create(
            zone.context(),
            CL_MEM_READ_ONLY,
            &format,
            &desc,
            ptr::null_mut(),
        )
    }
    .map_err(|e| cl_error("create source image", e))?;

    let mut target_image = unsafe {
        Image::create(
            zone.context(),
            CL_MEM_WRITE_ONLY,
            &format,
            &desc,
            ptr::null_mut(),
        )
    }
    .map_err(|e| cl_error("create target image", e))?;

    let origin = [0usize, 0, 0];
    let region = [width, height, 1usize];
    let cl_width = width as cl_int;
    let cl_height = height as cl_int;

    let mut timings = Vec::with_capacity(3);

    let sw = Stopwatch::start("write image");
    unsafe {
        zone.queue()
            .enqueue_write_image(
                &mut source_image,
                CL_BLOCKING,
                origin.as_ptr(),
                region.as_ptr(),
                0,
                0,
                source.as_ptr() as *mut c_void,
                &[],
            )
            .map_err(|e| cl_error("clEnqueueWriteImage", e))?;
    }
    timings.push(sw.stop());
    log::debug!("source image uploaded ({} bytes)", source.len());

    let global = global_work_size(width, height);
    let sw = Stopwatch::start("kernel");
    let kernel_event = unsafe {
        ExecuteKernel::new(&kernel)
            .set_arg(&source_image)
            .set_arg(&target_image)
            .set_arg(&cl_width)
            .set_arg(&cl_height)
            .set_local_work_sizes(&LOCAL_WORK_SIZE)
            .set_global_work_sizes(&global)
            .enqueue_nd_range(zone.queue())
            .map_err(|e| cl_error("clEnqueueNDRangeKernel", e))?
    };
    // The dispatch is asynchronous; the stage covers execution, not just
    // submission.
    kernel_event
        .wait()
        .map_err(|e| cl_error("clWaitForEvents", e))?;
    timings.push(sw.stop());
    log::debug!("kernel executed over {}x{} grid", global[0], global[1]);

    let mut pixels = vec![0u8; width * height * RGBA_BYTES_PER_PIXEL];
    let sw = Stopwatch::start("read image");
    unsafe {
        zone.queue()
            .enqueue_read_image(
                &mut target_image,
                CL_BLOCKING,
                origin.as_ptr(),
                region.as_ptr(),
                0,
                0,
                pixels.as_mut_ptr() as *mut c_void,
                &[],
            )
            .map_err(|e| cl_error("clEnqueueReadImage", e))?;
    }
    timings.push(sw.stop());
    log::debug!("target image downloaded ({} bytes)", pixels.len());

    Ok(CopyOutput { pixels, timings })
}
