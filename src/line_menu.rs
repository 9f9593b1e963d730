//! Line-oriented menu for cooked terminals.
//!
//! No raw mode and no cursor keys: the menu is printed, one line is read
//! and parsed as a position. Useful when stdin is a pipe or the terminal
//! cannot be switched to raw mode.

use std::io::{self, Write};

use tracing::{debug, error, info};

use crate::config::MenuConfig;
use crate::core::{confirm_pending_in, Entry, InputSource, Layout, SelectionState, StdinInput};
use crate::error::{MenuError, Result};
use crate::menu::MenuFrontend;
use crate::ui::MenuRenderer;

const INFO: &str = "menu using line input";

/// Menu that reads whole lines.
#[derive(Debug)]
pub struct LineMenu {
    title: String,
    entries: Vec<Entry>,
    config: MenuConfig,
}

impl LineMenu {
    /// # Errors
    ///
    /// Returns [`MenuError::NoEntries`] if `entries` is empty.
    pub fn with_config(
        title: impl Into<String>,
        entries: Vec<Entry>,
        config: MenuConfig,
    ) -> Result<Self> {
        if entries.is_empty() {
            error!("No menu entries given");
            return Err(MenuError::NoEntries);
        }
        Ok(Self {
            title: title.into(),
            entries,
            config,
        })
    }

    pub fn new(title: impl Into<String>, entries: Vec<Entry>) -> Result<Self> {
        Self::with_config(title, entries, MenuConfig::load())
    }

    pub fn run(&self) -> Result<()> {
        self.run_on(&mut StdinInput::new(), &mut io::stdout())
    }

    pub fn info(&self) -> String {
        INFO.to_string()
    }

    pub fn run_on<I: InputSource, W: Write>(&self, input: &mut I, out: &mut W) -> Result<()> {
        let mut renderer = MenuRenderer::new(&self.config);
        loop {
            let layout = Layout::resolve(&self.title, &self.entries)?;
            let bounds = layout.bounds();
            renderer.draw(out, &layout, &SelectionState::new(bounds, 0))?;

            let line = read_line(input)?.ok_or(MenuError::InputClosed)?;
            let choice = line.trim().parse::<usize>().ok().filter(|pos| bounds.contains(*pos));
            let Some(pos) = choice else {
                debug!("Rejected selection {:?}", line.trim());
                writeln!(out, "{}", self.config.range_text(bounds.first, bounds.last))?;
                out.flush()?;
                self.wait_enter(input)?;
                continue;
            };

            let Some(index) = layout.index_at(pos) else {
                continue;
            };
            let entry = &self.entries[index];
            if layout.is_terminal(pos) {
                info!("Exit entry '{}' selected", entry.label);
                entry.invoke();
                return Ok(());
            }

            writeln!(out, "{}", self.config.executing_message)?;
            out.flush()?;
            if entry.invoke() {
                writeln!(out, "{}", self.config.pause_message)?;
                out.flush()?;
                self.wait_enter(input)?;
            }
        }
    }

    fn wait_enter<I: InputSource>(&self, input: &mut I) -> Result<()> {
        if confirm_pending_in(input, -1)? {
            Ok(())
        } else {
            Err(MenuError::InputClosed)
        }
    }
}

impl MenuFrontend for LineMenu {
    fn run(&self) -> Result<()> {
        LineMenu::run(self)
    }

    fn info(&self) -> String {
        LineMenu::info(self)
    }
}

/// Read up to and excluding the next newline. `None` at end of input.
fn read_line<I: InputSource>(input: &mut I) -> Result<Option<String>> {
    let mut bytes = Vec::new();
    loop {
        match input.read_byte()? {
            Some(b'\n') => break,
            Some(byte) => bytes.push(byte),
            None if bytes.is_empty() => return Ok(None),
            None => break,
        }
    }
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
