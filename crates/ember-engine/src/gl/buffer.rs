use super::error::{Error, Result};

/// Byte alignment required for buffer sizes and queue writes.
pub const COPY_ALIGNMENT: u64 = wgpu::COPY_BUFFER_ALIGNMENT;

/// Rounds `size` up to the next multiple of `align` (`align` must be a power of two).
///
/// For compile-time type sizes only; runtime sizes go through `checked_size`.
#[inline]
pub(crate) const fn align_up(size: u64, align: u64) -> u64 {
    (size + align - 1) & !(align - 1)
}

/// Scope-owned GPU buffer.
///
/// The native handle is created in [`Buffer::new`] and released when the
/// wrapper is dropped. The type is move-only; moving transfers ownership.
#[derive(Debug)]
pub struct Buffer {
    raw: wgpu::Buffer,
    label: String,
}

impl Buffer {
    /// Allocates `size` bytes (rounded up to [`COPY_ALIGNMENT`]).
    ///
    /// Fails instead of panicking when the request is empty or exceeds the
    /// device's `max_buffer_size`.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Result<Self> {
        let size = checked_size(label, size, device.limits().max_buffer_size)?;

        let raw = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        });

        log::debug!("created buffer `{label}` ({size} bytes, {usage:?})");

        Ok(Self {
            raw,
            label: label.to_string(),
        })
    }

    /// Returns the native handle.
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }

    /// Allocated size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.raw.size()
    }

    #[inline]
    pub fn usage(&self) -> wgpu::BufferUsages {
        self.raw.usage()
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Binds the whole buffer as vertex input `slot` of the current pass.
    pub fn bind_vertex(&self, rpass: &mut wgpu::RenderPass<'_>, slot: u32) {
        rpass.set_vertex_buffer(slot, self.raw.slice(..));
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        log::trace!("releasing buffer `{}`", self.label);
    }
}

/// Validates a requested allocation against the device limit.
fn checked_size(label: &str, size: u64, limit: u64) -> Result<u64> {
    if size == 0 {
        return Err(Error::EmptyBuffer {
            label: label.to_string(),
        });
    }

    match size.checked_next_multiple_of(COPY_ALIGNMENT) {
        Some(aligned) if aligned <= limit => Ok(aligned),
        aligned => Err(Error::BufferTooLarge {
            label: label.to_string(),
            requested: aligned.unwrap_or(size),
            limit,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_multiple() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(1, 4), 4);
        assert_eq!(align_up(4, 4), 4);
        assert_eq!(align_up(13, 8), 16);
    }

    #[test]
    fn checked_size_rejects_zero() {
        assert!(matches!(
            checked_size("empty", 0, 1024),
            Err(Error::EmptyBuffer { .. })
        ));
    }

    #[test]
    fn checked_size_rounds_to_copy_alignment() {
        assert_eq!(checked_size("b", 6, 1024).unwrap(), 8);
    }

    #[test]
    fn checked_size_rejects_over_limit() {
        let err = checked_size("huge", 1025, 1024).unwrap_err();
        match err {
            Error::BufferTooLarge { requested, limit, .. } => {
                assert_eq!(requested, 1028);
                assert_eq!(limit, 1024);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn checked_size_near_u64_max_is_too_large() {
        match checked_size("huge", u64::MAX, 1024).unwrap_err() {
            Error::BufferTooLarge { requested, limit, .. } => {
                assert_eq!(requested, u64::MAX);
                assert_eq!(limit, 1024);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Even a limit of u64::MAX cannot hold the rounded-up size.
        assert!(checked_size("huge", u64::MAX - 1, u64::MAX).is_err());
    }

    #[test]
    fn checked_size_limit_applies_after_alignment() {
        // 1023 rounds to 1024, which still fits.
        assert_eq!(checked_size("edge", 1023, 1024).unwrap(), 1024);
    }
}
