//! Command handlers.
//!
//! Handlers follow the same pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<...>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call into spdl-core, spdl-sources and spdl-download
//!   3. Format output for the terminal

pub mod check_deps;
pub mod config;
pub mod download;
pub mod paths;
pub mod retry;
pub mod sources;
pub mod stats;
