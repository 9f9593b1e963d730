//! Menu renderer using crossterm
//!
//! Draws the title, one line per visible entry and the prompt echoing the
//! digit buffer. Output uses `\r\n` line endings since frames are drawn
//! while the terminal is in raw mode.

use std::io::{self, Write};

use bitflags::bitflags;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use unicode_width::UnicodeWidthStr;

use crate::config::MenuConfig;
use crate::core::{Layout, SelectionState};

bitflags! {
    /// Text attributes for the highlighted entry
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TextAttrs: u8 {
        const BOLD      = 0b0001;
        const UNDERLINE = 0b0010;
        const REVERSE   = 0b0100;
    }
}

/// Highlight style resolved from configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HighlightStyle {
    pub attrs: TextAttrs,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            attrs: TextAttrs::BOLD,
            fg: Some(Color::Black),
            bg: Some(Color::White),
        }
    }
}

/// Menu renderer
pub struct MenuRenderer {
    prompt: String,
    clear_screen: bool,
    style: HighlightStyle,
    /// Buffer text of the last drawn frame
    last_buffer: Option<String>,
}

impl Default for MenuRenderer {
    fn default() -> Self {
        Self::new(&MenuConfig::default())
    }
}

/// Text of one entry line, without styling
pub fn entry_line(position: usize, label: &str) -> String {
    format!("{} : to {}", position, label)
}

impl MenuRenderer {
    pub fn new(config: &MenuConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            clear_screen: config.clear_screen,
            style: HighlightStyle {
                attrs: config.highlight.attrs(),
                fg: config.highlight.foreground_color(),
                bg: config.highlight.background_color(),
            },
            last_buffer: None,
        }
    }

    /// Draw a complete frame
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        layout: &Layout<'_>,
        state: &SelectionState,
    ) -> io::Result<()> {
        if self.clear_screen {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        queue!(out, Print(format!("== {} menu ==\r\n", layout.title)))?;

        let width = layout
            .slots()
            .iter()
            .map(|slot| entry_line(slot.position, slot.label).width())
            .max()
            .unwrap_or(0);

        for slot in layout.slots() {
            let line = entry_line(slot.position, slot.label);
            if slot.position == state.cursor() {
                let pad = width.saturating_sub(line.width());
                self.draw_highlighted(out, &format!("{}{}", line, " ".repeat(pad)))?;
            } else {
                queue!(out, Print(line))?;
            }
            queue!(out, Print("\r\n"))?;
        }

        // Cursor 0 leaves the prompt blank.
        queue!(out, Print(&self.prompt))?;
        if state.cursor() != 0 {
            queue!(out, Print(state.buffer()))?;
        }
        out.flush()?;

        self.last_buffer = Some(state.buffer().to_string());
        Ok(())
    }

    /// Redraw only if the digit buffer changed since the last frame.
    ///
    /// Returns whether a frame was drawn.
    pub fn refresh<W: Write>(
        &mut self,
        out: &mut W,
        layout: &Layout<'_>,
        state: &SelectionState,
    ) -> io::Result<bool> {
        if self.last_buffer.as_deref() == Some(state.buffer()) {
            return Ok(false);
        }
        self.draw(out, layout, state)?;
        Ok(true)
    }

    /// Forget the last frame so the next refresh draws unconditionally
    pub fn invalidate(&mut self) {
        self.last_buffer = None;
    }

    fn draw_highlighted<W: Write>(&self, out: &mut W, text: &str) -> io::Result<()> {
        let style = &self.style;
        if style.attrs.contains(TextAttrs::BOLD) {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.attrs.contains(TextAttrs::UNDERLINE) {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        if style.attrs.contains(TextAttrs::REVERSE) {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        if let Some(fg) = style.fg {
            queue!(out, SetForegroundColor(fg))?;
        }
        if let Some(bg) = style.bg {
            queue!(out, SetBackgroundColor(bg))?;
        }
        queue!(out, Print(text), ResetColor, SetAttribute(Attribute::Reset))
    }
}
