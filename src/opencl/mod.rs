//! OpenCL module for the copy pipeline
//!
//! This module handles interaction with the GPU via OpenCL,
//! including device selection, image transfer and kernel dispatch.

mod copy;
mod error;
mod zone;

pub use copy::{COPY_KERNEL_SOURCE, CopyOutput, run_copy};
pub use zone::{ClZone, ZoneConfig, list_devices};
