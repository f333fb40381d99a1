//! Translation of OpenCL status codes into human-readable messages.
//!
//! `opencl3` surfaces failures as `ClError(cl_int)` whose Display is just
//! the numeric code; every OpenCL call site in this crate wraps that into
//! an error carrying the operation name, the code and the text.

use anyhow::anyhow;
use opencl3::error_codes::ClError;
use opencl3::types::cl_int;

/// Human-readable message for an OpenCL status code.
pub fn cl_strerror(code: cl_int) -> &'static str {
    match code {
        0 => "Success!",
        -1 => "Device not found.",
        -2 => "Device not available",
        -3 => "Compiler not available",
        -4 => "Memory object allocation failure",
        -5 => "Out of resources",
        -6 => "Out of host memory",
        -7 => "Profiling information not available",
        -8 => "Memory copy overlap",
        -9 => "Image format mismatch",
        -10 => "Image format not supported",
        -11 => "Program build failure",
        -12 => "Map failure",
        -30 => "Invalid value",
        -31 => "Invalid device type",
        -32 => "Invalid platform",
        -33 => "Invalid device",
        -34 => "Invalid context",
        -35 => "Invalid queue properties",
        -36 => "Invalid command queue",
        -37 => "Invalid host pointer",
        -38 => "Invalid memory object",
        -39 => "Invalid image format descriptor",
        -40 => "Invalid image size",
        -41 => "Invalid sampler",
        -42 => "Invalid binary",
        -43 => "Invalid build options",
        -44 => "Invalid program",
        -45 => "Invalid program executable",
        -46 => "Invalid kernel name",
        -47 => "Invalid kernel definition",
        -48 => "Invalid kernel",
        -49 => "Invalid argument index",
        -50 => "Invalid argument value",
        -51 => "Invalid argument size",
        -52 => "Invalid kernel arguments",
        -53 => "Invalid work dimension",
        -54 => "Invalid work group size",
        -55 => "Invalid work item size",
        -56 => "Invalid global offset",
        -57 => "Invalid event wait list",
        -58 => "Invalid event",
        -59 => "Invalid operation",
        -60 => "Invalid OpenGL object",
        -61 => "Invalid buffer size",
        -62 => "Invalid mip-map level",
        -63 => "Invalid global work size",
        _ => "Unknown",
    }
}

/// Wrap a failed OpenCL operation into an error with code and message.
pub fn cl_error(op: &str, err: ClError) -> anyhow::Error {
    anyhow!("{} failed [{}]: {}", op, err.0, cl_strerror(err.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_translate() {
        assert_eq!(cl_strerror(0), "Success!");
        assert_eq!(cl_strerror(-1), "Device not found.");
        assert_eq!(cl_strerror(-48), "Invalid kernel");
        assert_eq!(cl_strerror(-63), "Invalid global work size");
    }

    #[test]
    fn unknown_codes_fall_through() {
        assert_eq!(cl_strerror(-9999), "Unknown");
        assert_eq!(cl_strerror(42), "Unknown");
    }

    #[test]
    fn cl_error_carries_operation_code_and_text() {
        let err = cl_error("clCreateKernel", ClError(-48));
        let msg = err.to_string();
        assert_eq!(msg, "clCreateKernel failed [-48]: Invalid kernel");
    }
}
