//! Menu rendering.
//!
//! - **renderer**: Frame drawing with a highlighted cursor line and
//!   redraw-on-change tracking

pub mod renderer;

pub use renderer::{entry_line, HighlightStyle, MenuRenderer, TextAttrs};
