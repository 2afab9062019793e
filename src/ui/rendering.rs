//! Text-grid rendering engine.
//!
//! - [truncate]: escape-aware width measurement, truncation and sanitizing.
//! - [content]: bounded line buffers, one per section.
//! - [border]: border glyph sets and the title/info/divider decorations.
//! - [renderer]: puts the above together into one fixed-size block.
//! - [style]: SGR emission for theme colors.

pub mod border;
pub mod content;
pub mod renderer;
pub mod style;
pub mod truncate;

pub use border::{BorderConfig, BorderGlyphs};
pub use content::ContentBuffer;
pub use renderer::{RenderError, Renderer, RendererConfig};
pub use style::Paint;
pub use truncate::{
    TruncateStyle, display_width, sanitize, strip_ansi, truncate, truncate_left,
};
