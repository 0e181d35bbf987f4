use std::borrow::Cow;
use std::ops::Range;

use super::buffer::{align_up, Buffer};
use super::error::{Error, Result};
use super::map::VertexBufferMap;

/// Per-vertex data that can be uploaded to a [`VertexBuffer`].
///
/// Implementors describe their shader-facing attributes once; the buffer
/// layout (stride, step mode) is derived from the type.
pub trait Vertex: bytemuck::Pod {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    const STEP_MODE: wgpu::VertexStepMode = wgpu::VertexStepMode::Vertex;

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: stride::<Self>(),
            step_mode: Self::STEP_MODE,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Distance in bytes between consecutive vertices of type `V`.
///
/// `size_of::<V>()` rounded up to the larger of the type's alignment and the
/// backend's vertex stride alignment.
pub const fn stride<V>() -> u64 {
    let align = std::mem::align_of::<V>() as u64;
    let align = if align > wgpu::VERTEX_STRIDE_ALIGNMENT {
        align
    } else {
        wgpu::VERTEX_STRIDE_ALIGNMENT
    };
    align_up(std::mem::size_of::<V>() as u64, align)
}

/// Typed GPU buffer holding `capacity` vertices.
///
/// Writes go through [`map`](Self::map), which hands out a scoped view. The
/// view borrows the buffer mutably, so the buffer cannot be bound for drawing
/// until the view is unmapped.
pub struct VertexBuffer<V: Vertex> {
    buffer: Buffer,
    capacity: usize,
    staging: Vec<V>,
}

impl<V: Vertex> VertexBuffer<V> {
    /// Allocates room for `capacity` vertices.
    ///
    /// `usage` is extended with `VERTEX | COPY_DST`.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Result<Self> {
        let size = (capacity as u64).saturating_mul(stride::<V>());
        let buffer = Buffer::new(
            device,
            label,
            size,
            usage | wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        )?;

        Ok(Self {
            buffer,
            capacity,
            staging: vec![V::zeroed(); capacity],
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the native handle.
    #[inline]
    pub fn raw(&self) -> &wgpu::Buffer {
        self.buffer.raw()
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Binds the buffer as vertex input `slot` of the current pass.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>, slot: u32) {
        self.buffer.bind_vertex(rpass, slot);
    }

    /// Maps every vertex for writing.
    ///
    /// The view starts with the contents of the previous map, so partial
    /// updates keep untouched vertices intact.
    pub fn map<'a>(&'a mut self, queue: &'a wgpu::Queue) -> VertexBufferMap<'a, V> {
        let capacity = self.capacity;
        VertexBufferMap::new(&self.buffer, queue, &mut self.staging[..capacity], 0)
    }

    /// Maps the vertices in `range` for writing.
    pub fn map_range<'a>(
        &'a mut self,
        queue: &'a wgpu::Queue,
        range: Range<usize>,
    ) -> Result<VertexBufferMap<'a, V>> {
        check_range(&range, self.capacity)?;
        let first = range.start;
        Ok(VertexBufferMap::new(
            &self.buffer,
            queue,
            &mut self.staging[range],
            first,
        ))
    }
}

fn check_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.start > range.end || range.end > len {
        return Err(Error::MapOutOfRange {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(())
}

/// Serializes vertices at [`stride`] spacing.
///
/// Borrows the input when the stride equals the type size, which holds for
/// all `#[repr(C)]` float vertex types.
pub(crate) fn encode_vertices<V: Vertex>(vertices: &[V]) -> Cow<'_, [u8]> {
    let size = std::mem::size_of::<V>();
    let stride = stride::<V>() as usize;

    if stride == size {
        return Cow::Borrowed(bytemuck::cast_slice(vertices));
    }

    let mut out = vec![0u8; vertices.len() * stride];
    for (dst, v) in out.chunks_exact_mut(stride).zip(vertices) {
        dst[..size].copy_from_slice(bytemuck::bytes_of(v));
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Pos {
        xy: [f32; 2],
    }

    impl Vertex for Pos {
        const ATTRIBUTES: &'static [wgpu::VertexAttribute] =
            &wgpu::vertex_attr_array![0 => Float32x2];
    }

    #[repr(C)]
    #[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
    struct Short {
        v: [u16; 3],
    }

    impl Vertex for Short {
        const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &[];
    }

    // ── stride ────────────────────────────────────────────────────────────

    #[test]
    fn stride_of_float_pair_is_size() {
        assert_eq!(stride::<Pos>(), 8);
    }

    #[test]
    fn stride_pads_to_vertex_alignment() {
        // 6 bytes of u16 data pad out to the 4-byte stride rule.
        assert_eq!(std::mem::size_of::<Short>(), 6);
        assert_eq!(stride::<Short>(), 8);
    }

    #[test]
    fn stride_respects_wide_alignment() {
        #[repr(C, align(16))]
        #[derive(Copy, Clone)]
        struct Wide {
            _v: [f32; 3],
        }
        assert_eq!(stride::<Wide>(), 16);
    }

    #[test]
    fn layout_uses_derived_stride() {
        let layout = Pos::layout();
        assert_eq!(layout.array_stride, 8);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);
    }

    // ── encode ────────────────────────────────────────────────────────────

    #[test]
    fn encode_borrows_when_unpadded() {
        let v = [Pos { xy: [1.0, 2.0] }, Pos { xy: [3.0, 4.0] }];
        let bytes = encode_vertices(&v);
        assert!(matches!(bytes, Cow::Borrowed(_)));
        assert_eq!(bytes.len(), 16);
    }

    #[test]
    fn encode_pads_each_vertex() {
        let v = [Short { v: [1, 2, 3] }, Short { v: [4, 5, 6] }];
        let bytes = encode_vertices(&v);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[0..6], bytemuck::bytes_of(&v[0]));
        assert_eq!(&bytes[6..8], &[0, 0]);
        assert_eq!(&bytes[8..14], bytemuck::bytes_of(&v[1]));
    }

    // ── ranges ────────────────────────────────────────────────────────────

    #[test]
    fn range_within_capacity_is_accepted() {
        assert!(check_range(&(0..4), 4).is_ok());
        assert!(check_range(&(4..4), 4).is_ok());
    }

    #[test]
    fn range_past_end_is_rejected() {
        assert!(matches!(
            check_range(&(2..5), 4),
            Err(Error::MapOutOfRange { start: 2, end: 5, len: 4 })
        ));
    }

    #[test]
    fn inverted_range_is_rejected() {
        #[allow(clippy::reversed_empty_ranges)]
        let r = 3..1;
        assert!(check_range(&r, 4).is_err());
    }
}
