use std::borrow::Cow;
use std::marker::PhantomData;

use super::buffer::{Buffer, COPY_ALIGNMENT};
use super::error::Result;
use super::program::{Program, UniformLocation};

/// Uniform buffer bound at a program's uniform location.
///
/// `T` must match the WGSL struct layout of the uniform variable, including
/// trailing padding to 16 bytes.
#[derive(Debug)]
pub struct Uniform<T: bytemuck::Pod> {
    buffer: Buffer,
    bind_group: wgpu::BindGroup,
    location: UniformLocation,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> Uniform<T> {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        program: &Program,
        location: UniformLocation,
        label: &str,
        initial: &T,
    ) -> Result<Self> {
        let buffer = Buffer::new(
            device,
            label,
            std::mem::size_of::<T>() as u64,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )?;

        let layout = program.bind_group_layout(location.group);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: location.binding,
                resource: buffer.raw().as_entire_binding(),
            }],
        });

        let uniform = Self {
            buffer,
            bind_group,
            location,
            _marker: PhantomData,
        };
        uniform.write(queue, initial);
        Ok(uniform)
    }

    #[inline]
    pub fn location(&self) -> UniformLocation {
        self.location
    }

    /// Uploads a new value. Takes effect for draws submitted afterwards.
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(self.buffer.raw(), 0, &padded_bytes(value));
    }

    /// Binds the uniform's group for subsequent draws in `rpass`.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_bind_group(self.location.group, &self.bind_group, &[]);
    }
}

/// `value`'s bytes, zero-extended to a multiple of [`COPY_ALIGNMENT`].
///
/// The buffer is allocated at the rounded-up size and queue writes must be
/// aligned, so a `T` of e.g. 6 bytes is written as 8.
fn padded_bytes<T: bytemuck::Pod>(value: &T) -> Cow<'_, [u8]> {
    let bytes = bytemuck::bytes_of(value);
    let rem = bytes.len() as u64 % COPY_ALIGNMENT;
    if rem == 0 {
        return Cow::Borrowed(bytes);
    }
    let mut out = bytes.to_vec();
    out.resize(bytes.len() + (COPY_ALIGNMENT - rem) as usize, 0);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_value_is_written_as_is() {
        let value = [1.0f32, 2.0, 3.0, 4.0];
        let bytes = padded_bytes(&value);
        assert!(matches!(bytes, Cow::Borrowed(_)));
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn odd_sized_value_is_zero_padded() {
        let value: [u16; 3] = [0x0102, 0x0304, 0x0506];
        let bytes = padded_bytes(&value);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..6], bytemuck::bytes_of(&value));
        assert_eq!(&bytes[6..], &[0, 0]);
    }

    #[test]
    fn single_byte_value_pads_to_alignment() {
        assert_eq!(padded_bytes(&7u8).len() as u64, COPY_ALIGNMENT);
    }
}
