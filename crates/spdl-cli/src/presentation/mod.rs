//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: no domain transforms.

pub mod progress;
pub mod summary;

pub use progress::ProgressEmitter;
pub use summary::{print_separator, print_summary, render_summary};
