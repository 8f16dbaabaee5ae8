//! pibench: a software-rendering performance benchmark
//!
//! Four procedural demos are drawn on the CPU into a fixed 640x480 frame,
//! one after another, while FPS and CPU load are sampled once a second. The
//! rendering core is host-agnostic; the `pibench` binary drives it with SDL2.

pub mod config;
pub mod display;
pub mod effects;
pub mod host;
pub mod sequencer;
pub mod stats;
pub mod telemetry;
pub mod util;

/// Frame width in pixels
pub const VIDEO_WIDTH: u32 = 640;
/// Frame height in pixels
pub const VIDEO_HEIGHT: u32 = 480;
