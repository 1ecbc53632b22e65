//! # reel-render
//!
//! Turns chunks into caption rasters and flattens an assembled timeline into
//! video frames. CPU only; caption frames are rendered on the rayon pool.

pub mod bitmap_font;
pub mod caption;
pub mod compositor;
pub mod font;
pub mod image_io;
pub mod pipeline;
pub mod text;

pub use caption::{CaptionLayout, CaptionRasterizer, LayoutMetrics, PreparedCaption};
pub use compositor::{Compositor, RenderResult};
pub use font::{FontResolver, FontSource};
pub use pipeline::CaptionPipeline;
pub use text::{TextRenderer, Typeface};
