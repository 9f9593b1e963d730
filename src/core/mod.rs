//! Core menu logic.
//!
//! This module contains the decision-making parts of the menu, independent
//! of how frames are drawn:
//!
//! - **input**: Byte sources with "is more input buffered" checks
//! - **decoder**: Raw bytes to key events (digits, arrows, ESC, Enter)
//! - **selection**: Digit buffer and cursor state machine
//! - **layout**: Entries and the per-frame visible layout
//! - **raw**: Scoped raw-mode terminal sessions
//!
//! # Data Flow
//!
//! ```text
//! InputSource ──byte──▶ KeyDecoder ──KeyEvent──▶ SelectionState
//!                                                   │ bounds
//!                              Layout::resolve ─────┘
//! ```

pub mod input;
pub mod decoder;
pub mod selection;
pub mod layout;
pub mod raw;

pub use decoder::{KeyDecoder, KeyEvent};
pub use input::{confirm_pending_in, is_confirm_pending, InputSource, StdinInput};
pub use layout::{Entry, Layout, Slot};
pub use raw::{CrosstermTerminal, RawSession, TerminalControl};
pub use selection::{Bounds, SelectionState, Transition};
