//! climenu - numbered menus for text terminals
//!
//! Give a title and an ordered list of entries; climenu renders a numbered
//! menu, lets the user move the selection with digits, Backspace, ESC or the
//! arrow keys, and runs the action bound to the confirmed entry. The last
//! entry is the exit entry and ends the session.
//!
//! # Keys
//!
//! | Key | Effect |
//! |-----|--------|
//! | 0-9 | Type a position (clamped to the visible range) |
//! | Backspace | Delete the last typed digit |
//! | ↑/↓ | Move the selection |
//! | Esc | Clear the selection |
//! | Enter | Run the selected entry |
//!
//! # Modules
//!
//! - **core**: Input decoding, selection state, layout and raw-mode sessions
//! - **ui**: Frame rendering
//! - **menu**: The raw-mode session controller
//! - **line_menu**: Cooked-mode fallback reading whole lines
//! - **config**: `~/.climenu/config.toml`

pub mod config;
pub mod core;
pub mod error;
pub mod line_menu;
pub mod menu;
pub mod ui;

pub use crate::config::MenuConfig;
pub use crate::core::{is_confirm_pending, Entry};
pub use crate::error::{MenuError, Result};
pub use crate::line_menu::LineMenu;
pub use crate::menu::{Console, Menu, MenuFrontend, Phase};
