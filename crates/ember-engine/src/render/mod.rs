//! Per-frame rendering handles.
//!
//! The runtime clears the surface, then hands apps a [`RenderCtx`] and a
//! [`RenderTarget`] to record their own passes with `gl` resources.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
