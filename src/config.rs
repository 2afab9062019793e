//! Configuration for panefm.
//!
//! - [load]: reading `panefm.toml` into the immutable [Config].
//! - [general]: the `[general]` table (listing, sort, preview and find options).
//! - [theme]: border glyphs and colors.
//! - [input]: key bindings and the editor command.
//! - [sidebar]: the directory sidebar.

pub mod general;
pub mod input;
pub mod load;
pub mod sidebar;
pub mod theme;

pub use general::{General, InternalGeneral};
pub use input::{Editor, Keys};
pub use load::{Config, ConfigError, RawConfig};
pub use sidebar::Sidebar;
pub use theme::Theme;
