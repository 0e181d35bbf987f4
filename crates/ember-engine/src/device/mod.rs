//! Device and surface ownership for a single window.
//!
//! [`Gpu`] borrows the window it presents to, so it can never outlive it.

mod context;
mod init;
mod surface;

pub use context::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
