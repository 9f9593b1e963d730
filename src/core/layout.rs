//! Menu entries and per-frame layout resolution
//!
//! A [`Layout`] maps dense display positions (1..=N) onto indices of the
//! full entry list. It is rebuilt on every redraw because visibility
//! predicates may reflect changing state.

use std::fmt;

use super::selection::Bounds;
use crate::error::{MenuError, Result};

type Predicate = Box<dyn Fn() -> bool>;

/// A single menu entry.
///
/// `action` returns whether the menu should wait for an explicit
/// acknowledgment before redrawing.
pub struct Entry {
    pub label: String,
    visible: Predicate,
    action: Predicate,
}

impl Entry {
    /// Creates an always-visible entry.
    pub fn new(label: impl Into<String>, action: impl Fn() -> bool + 'static) -> Self {
        Self {
            label: label.into(),
            visible: Box::new(|| true),
            action: Box::new(action),
        }
    }

    /// Show this entry only while `predicate` holds.
    ///
    /// The last entry of a menu is shown regardless.
    pub fn visible_when(mut self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.visible = Box::new(predicate);
        self
    }

    pub fn is_visible(&self) -> bool {
        (self.visible)()
    }

    /// Run the action; `true` requests a pause before the next redraw.
    pub fn invoke(&self) -> bool {
        (self.action)()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry").field("label", &self.label).finish_non_exhaustive()
    }
}

/// One shown line of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot<'a> {
    /// 1-based display position.
    pub position: usize,
    /// Index into the full entry list.
    pub index: usize,
    pub label: &'a str,
}

/// Entries shown in one frame.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub title: &'a str,
    slots: Vec<Slot<'a>>,
}

impl<'a> Layout<'a> {
    /// Resolve the visible entries.
    ///
    /// Every predicate is evaluated exactly once, in order. The last entry
    /// is always included.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NoEntries`] if `entries` is empty.
    pub fn resolve(title: &'a str, entries: &'a [Entry]) -> Result<Self> {
        let Some(last_index) = entries.len().checked_sub(1) else {
            return Err(MenuError::NoEntries);
        };
        let mut slots = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            // Evaluate first so the exit entry's predicate still runs once.
            let shown = entry.is_visible();
            if shown || index == last_index {
                slots.push(Slot {
                    position: slots.len() + 1,
                    index,
                    label: &entry.label,
                });
            }
        }

        Ok(Self { title, slots })
    }

    pub fn slots(&self) -> &[Slot<'a>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn first_position(&self) -> usize {
        self.slots.first().map_or(0, |s| s.position)
    }

    pub fn last_position(&self) -> usize {
        self.slots.last().map_or(0, |s| s.position)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.first_position(), self.last_position())
    }

    /// Entry index shown at `position`.
    pub fn index_at(&self, position: usize) -> Option<usize> {
        position
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
            .map(|slot| slot.index)
    }

    /// Whether `position` addresses the exit entry.
    pub fn is_terminal(&self, position: usize) -> bool {
        position != 0 && position == self.last_position()
    }
}
