//! Small pure helpers shared across crates.

mod format;
mod sanitize;
mod template;

pub use format::{format_duration, format_size};
pub use sanitize::sanitize_filename;
pub use template::{FilenameFields, TemplateError, render_filename, validate_template};
