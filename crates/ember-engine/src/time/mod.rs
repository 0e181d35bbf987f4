//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per render loop; call `tick()` once per presented frame
//! - one `FramePacer` when the loop should run at a fixed rate instead of
//!   the display's refresh rate

mod frame_clock;
mod pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::{FramePacer, Pace};
