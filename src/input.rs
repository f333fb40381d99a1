//! Memory-mapped input file.
//!
//! The source image is mapped read-only rather than read into a heap
//! buffer; the mapping lives for the whole run and is released on drop.

use anyhow::{Context, Result, bail};
use nix::sys::mman::{MapFlags, ProtFlags, mmap, munmap};
use std::ffi::c_void;
use std::fs::File;
use std::num::NonZeroUsize;
use std::os::fd::AsRawFd;
use std::path::Path;

/// Bytes per pixel for RGBA with 8-bit channels.
pub const RGBA_BYTES_PER_PIXEL: usize = 4;

/// A read-only memory mapping of the input image file.
#[derive(Debug)]
pub struct MappedImage {
    ptr: *mut c_void,
    len: usize,
    // Keeps the descriptor open for the lifetime of the mapping.
    _file: File,
}

impl MappedImage {
    /// Open `path` and map its full contents read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?
            .len() as usize;
        let length = NonZeroUsize::new(len)
            .with_context(|| format!("{} is empty", path.display()))?;

        let ptr = unsafe {
            mmap(
                None,
                length,
                ProtFlags::PROT_READ,
                MapFlags::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        }
        .with_context(|| format!("failed to mmap {}", path.display()))?;

        Ok(MappedImage {
            ptr,
            len,
            _file: file,
        })
    }

    /// The mapped file contents.
    pub fn bytes(&self) -> &[u8] {
        // Valid for self.len bytes until munmap in Drop.
        unsafe { std::slice::from_raw_parts(self.ptr as *const u8, self.len) }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Check that the file holds at least a full `width` x `height` RGBA
    /// payload, and return that prefix.
    pub fn rgba_pixels(&self, width: usize, height: usize) -> Result<&[u8]> {
        let expected = expected_rgba_len(width, height)?;
        if self.len < expected {
            bail!(
                "input file is {} bytes, expected at least {} for {}x{} RGBA",
                self.len,
                expected,
                width,
                height
            );
        }
        Ok(&self.bytes()[..expected])
    }
}

impl Drop for MappedImage {
    fn drop(&mut self) {
        if let Err(e) = unsafe { munmap(self.ptr, self.len) } {
            log::warn!("munmap failed: {}", e);
        }
    }
}

// The mapping is read-only and the descriptor is owned.
unsafe impl Send for MappedImage {}
unsafe impl Sync for MappedImage {}

/// Byte length of a `width` x `height` RGBA image, guarding overflow.
pub fn expected_rgba_len(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        bail!("image dimensions must be non-zero, got {}x{}", width, height);
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(RGBA_BYTES_PER_PIXEL))
        .with_context(|| format!("image dimensions {}x{} overflow", width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cvcl-input-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn maps_file_contents() {
        let path = temp_path("map");
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut f = File::create(&path).unwrap();
        f.write_all(&data).unwrap();
        drop(f);

        let mapped = MappedImage::open(&path).unwrap();
        assert_eq!(mapped.len(), data.len());
        assert_eq!(mapped.bytes(), &data[..]);
        drop(mapped);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn open_missing_file_reports_path() {
        let err = MappedImage::open(Path::new("/no/such/cvcl-input")).unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn rgba_prefix_requires_full_payload() {
        let path = temp_path("short");
        let mut f = File::create(&path).unwrap();
        f.write_all(&[0u8; 64]).unwrap();
        drop(f);

        let mapped = MappedImage::open(&path).unwrap();
        // 4x4 RGBA = 64 bytes, exactly covered.
        assert_eq!(mapped.rgba_pixels(4, 4).unwrap().len(), 64);
        // 8x8 RGBA = 256 bytes, too large for the file.
        let err = mapped.rgba_pixels(8, 8).unwrap_err();
        assert!(err.to_string().contains("expected at least 256"));
        drop(mapped);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn expected_len_rejects_zero_and_overflow() {
        assert_eq!(expected_rgba_len(720, 480).unwrap(), 720 * 480 * 4);
        assert!(expected_rgba_len(0, 480).is_err());
        assert!(expected_rgba_len(usize::MAX, 2).is_err());
    }
}
