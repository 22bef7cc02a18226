//! Radar sweep rendering CLI library.
//!
//! Exposes configuration and the render driver for the binary and its tests.

pub mod config;
pub mod pipeline;

pub use config::RenderConfig;
pub use pipeline::{run, RenderJob, RenderMode, RenderSummary};
