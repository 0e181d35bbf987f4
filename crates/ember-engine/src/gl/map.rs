use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use super::buffer::Buffer;
use super::vertex_buffer::{encode_vertices, stride, Vertex};

/// Writable view onto a mapped [`VertexBuffer`](super::VertexBuffer) range.
///
/// Mapping borrows the owning buffer mutably, so the buffer cannot be bound
/// or remapped while the view exists. Dropping the view (or calling
/// [`unmap`](Self::unmap)) commits the written vertices to the GPU. A moved
/// view carries the commit with it; the moved-from binding does nothing.
pub struct VertexBufferMap<'a, V: Vertex> {
    buffer: &'a Buffer,
    queue: &'a wgpu::Queue,
    data: &'a mut [V],
    pending: PendingWrite,
}

impl<'a, V: Vertex> VertexBufferMap<'a, V> {
    pub(super) fn new(
        buffer: &'a Buffer,
        queue: &'a wgpu::Queue,
        data: &'a mut [V],
        first: usize,
    ) -> Self {
        log::trace!(
            "mapped `{}` vertices {}..{}",
            buffer.label(),
            first,
            first + data.len()
        );
        Self {
            buffer,
            queue,
            data,
            pending: PendingWrite::new(first),
        }
    }

    /// Index of the first mapped vertex within the buffer.
    #[inline]
    pub fn first(&self) -> usize {
        self.pending.first
    }

    #[inline]
    pub fn data(&self) -> &[V] {
        &*self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [V] {
        &mut *self.data
    }

    /// Commits the written range and releases the mapping.
    pub fn unmap(mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        let Some(first) = self.pending.take() else {
            return;
        };
        let Some((offset, bytes)) = commit_plan(first, &*self.data) else {
            return;
        };

        self.queue.write_buffer(self.buffer.raw(), offset, &bytes);

        log::trace!(
            "unmapped `{}` ({} bytes at offset {offset})",
            self.buffer.label(),
            bytes.len()
        );
    }
}

/// Upload owed by a mapped view; handed out at most once.
#[derive(Debug)]
struct PendingWrite {
    first: usize,
    armed: bool,
}

impl PendingWrite {
    fn new(first: usize) -> Self {
        Self { first, armed: true }
    }

    /// Returns the first vertex index on the first call, `None` afterwards.
    fn take(&mut self) -> Option<usize> {
        std::mem::replace(&mut self.armed, false).then_some(self.first)
    }
}

/// Byte offset and payload for writing `data` at vertex index `first`.
///
/// `None` when there is nothing to write.
fn commit_plan<V: Vertex>(first: usize, data: &[V]) -> Option<(u64, Cow<'_, [u8]>)> {
    if data.is_empty() {
        return None;
    }
    let offset = first as u64 * stride::<V>();
    Some((offset, encode_vertices(data)))
}

impl<V: Vertex> Deref for VertexBufferMap<'_, V> {
    type Target = [V];

    #[inline]
    fn deref(&self) -> &[V] {
        &*self.data
    }
}

impl<V: Vertex> DerefMut for VertexBufferMap<'_, V> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [V] {
        &mut *self.data
    }
}

impl<V: Vertex> Drop for VertexBufferMap<'_, V> {
    fn drop(&mut self) {
        self.commit();
    }
}
