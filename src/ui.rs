//! Terminal UI for panefm.
//!
//! - [rendering]: the text-grid engine that builds fixed-size bordered blocks.
//! - [panes]: one block builder per panel (file panels, preview, help, find).
//! - [render]: frame layout, called once per frame by the terminal loop.

pub mod panes;
pub mod render;
pub mod rendering;

pub use render::render;
