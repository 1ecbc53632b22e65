//! # reel-core
//!
//! Core types and primitives for the Reel caption engine.
//! This crate contains foundational types shared across all Reel crates:
//! frame buffers, colors, durations, caption style, configuration, and error types.

pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod hash;
pub mod style;
pub mod time;

pub use config::*;

pub use color::Color;
pub use error::{ReelError, ReelResult};
pub use frame::FrameBuffer;
pub use style::{Background, FontFamily, Style, StyleConfig, VerticalAnchor};
pub use time::{Duration, Timestamp};
