#![deny(unsafe_code)]
//! Headless host for the particle swarm.
//!
//! [`Session`] owns the field, the drag tracker, and a fixed-rate
//! [`FrameScheduler`]. Scripted input comes from a JSON [`Timeline`];
//! frames leave through [`pixel::points_to_rgba`] or, with the `png`
//! feature, as PNG files.

pub mod pixel;
pub mod scheduler;
pub mod session;
#[cfg(feature = "png")]
pub mod snapshot;
pub mod timeline;

pub use scheduler::{FrameScheduler, TickBudget};
pub use session::{PlaybackReport, Session};
pub use timeline::{Event, Timeline, TimelineEntry};
