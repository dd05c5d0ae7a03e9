//! Progress throttling.
//!
//! Byte progress from sources arrives per chunk; this module rate-limits it
//! before it becomes `TrackProgress` events.

mod throttle;

pub use throttle::ProgressThrottle;
