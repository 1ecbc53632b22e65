//! # reel-ir
//!
//! The Reel intermediate representation: the values a generation request
//! derives from its script, in pipeline order.
//!
//! `Script` → `Schedule` (per-word timing) → `Chunk`s (display groups) →
//! `CaptionFrame`s → `Timeline`. Each stage produces new values from the
//! previous one; nothing is mutated after construction.

pub mod chunk;
pub mod schedule;
pub mod script;
pub mod srt;
pub mod timeline;
pub mod validate;

pub use chunk::{Chunk, ChunkPlanner};
pub use schedule::{ProportionalAllocator, Schedule, TimeAllocator, WordTiming};
pub use script::{Script, Word};
pub use timeline::{AudioTrack, BackgroundLayer, CaptionFrame, CaptionImage, Timeline, TimelineAssembler};
