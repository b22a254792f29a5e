//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (clock sources)
//! - Frame requests and countdown timers
//! - Pointer coordinates and surface sizing

pub mod input;
pub mod scheduler;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{surface_point, surface_size};
pub use scheduler::{FrameHandle, ManualScheduler, Scheduler, TimerHandle, TimerKind, Wakeup};
#[cfg(not(target_arch = "wasm32"))]
pub use time::SystemClock;
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
