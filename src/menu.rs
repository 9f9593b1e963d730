//! Interactive menu session controller.
//!
//! A [`Menu`] owns its entries for its whole lifetime and runs a simple
//! phase loop until the exit entry is chosen:
//!
//! ```text
//! Layout ──▶ Render ──▶ AwaitInput ──▶ Dispatch ──▶ Layout ...
//!                                          │
//!                                          └──(exit entry)──▶ Terminated
//! ```
//!
//! Each iteration completes before the next begins. Input is only read
//! while a [`RawSession`] is held, so exactly one reader is active at a time.
//!
//! # Example
//!
//! ```no_run
//! use climenu::{Entry, Menu};
//!
//! let menu = Menu::new("Test", vec![
//!     Entry::new("Run first operation", || { println!("one"); true }),
//!     Entry::new("Exit menu", || false),
//! ])?;
//! menu.run()?;
//! # Ok::<(), climenu::MenuError>(())
//! ```

use std::io::{self, Write};

use tracing::{debug, error, info};

use crate::config::MenuConfig;
use crate::core::{
    CrosstermTerminal, Entry, InputSource, KeyDecoder, KeyEvent, Layout, RawSession,
    SelectionState, StdinInput, TerminalControl, Transition,
};
use crate::error::{MenuError, Result};
use crate::ui::MenuRenderer;

const INFO: &str = "menu using cli";

/// Common surface of the menu front ends.
pub trait MenuFrontend {
    /// Run until the exit entry has been chosen.
    fn run(&self) -> Result<()>;
    /// Short description of the implementation.
    fn info(&self) -> String;
}

/// Input, output and terminal mode control used by a session.
#[derive(Debug)]
pub struct Console<I, W, T> {
    pub input: I,
    pub output: W,
    pub terminal: T,
}

impl Console<StdinInput, io::Stdout, CrosstermTerminal> {
    /// The process's own terminal.
    pub fn stdio() -> Self {
        Self {
            input: StdinInput::new(),
            output: io::stdout(),
            terminal: CrosstermTerminal::new(),
        }
    }
}

/// Controller phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Layout,
    Render,
    AwaitInput,
    Dispatch,
    Terminated,
}

/// Phase plus the data it carries.
enum Step<'m> {
    Layout,
    Render(Layout<'m>),
    AwaitInput(Layout<'m>, SelectionState),
    Dispatch(Layout<'m>, usize),
    Terminated,
}

impl Step<'_> {
    fn phase(&self) -> Phase {
        match self {
            Step::Layout => Phase::Layout,
            Step::Render(..) => Phase::Render,
            Step::AwaitInput(..) => Phase::AwaitInput,
            Step::Dispatch(..) => Phase::Dispatch,
            Step::Terminated => Phase::Terminated,
        }
    }
}

/// Numbered terminal menu.
///
/// The last entry is the exit entry: it is always shown and choosing it
/// ends [`Menu::run`] whatever its action returns.
#[derive(Debug)]
pub struct Menu {
    title: String,
    entries: Vec<Entry>,
    config: MenuConfig,
}

impl Menu {
    /// Creates a menu with the configuration from `~/.climenu/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::NoEntries`] if `entries` is empty.
    pub fn new(title: impl Into<String>, entries: Vec<Entry>) -> Result<Self> {
        Self::with_config(title, entries, MenuConfig::load())
    }

    /// Creates a menu with an explicit configuration.
    ///
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

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Run on the process's terminal until the exit entry is chosen.
    pub fn run(&self) -> Result<()> {
        self.run_on(&mut Console::stdio())
    }

    pub fn info(&self) -> String {
        INFO.to_string()
    }

    /// Run on an arbitrary console.
    ///
    /// # Errors
    ///
    /// [`MenuError::InputClosed`] if input ends before the exit entry is
    /// chosen, [`MenuError::Io`] if drawing or reading fails. The terminal
    /// mode is restored in either case.
    pub fn run_on<I, W, T>(&self, console: &mut Console<I, W, T>) -> Result<()>
    where
        I: InputSource,
        W: Write,
        T: TerminalControl,
    {
        info!("Menu '{}' started with {} entries", self.title, self.entries.len());
        let mut renderer = MenuRenderer::new(&self.config);
        let mut cursor = 0;
        let mut step = Step::Layout;

        loop {
            debug!(phase = ?step.phase());
            step = match step {
                Step::Layout => Step::Render(Layout::resolve(&self.title, &self.entries)?),
                Step::Render(layout) => {
                    // Drawn once the raw session is held, see `await_selection`.
                    let state = SelectionState::new(layout.bounds(), cursor);
                    renderer.invalidate();
                    Step::AwaitInput(layout, state)
                }
                Step::AwaitInput(layout, mut state) => {
                    let pos = self.await_selection(console, &mut renderer, &layout, &mut state)?;
                    cursor = pos;
                    Step::Dispatch(layout, pos)
                }
                Step::Dispatch(layout, pos) => self.dispatch(console, &layout, pos)?,
                Step::Terminated => {
                    info!("Menu '{}' finished", self.title);
                    return Ok(());
                }
            };
        }
    }

    /// Draw the frame, then read keys until a valid selection is confirmed.
    ///
    /// The frame is drawn inside the raw session so the cursor is already
    /// hidden when it appears.
    fn await_selection<I, W, T>(
        &self,
        console: &mut Console<I, W, T>,
        renderer: &mut MenuRenderer,
        layout: &Layout<'_>,
        state: &mut SelectionState,
    ) -> Result<usize>
    where
        I: InputSource,
        W: Write,
        T: TerminalControl,
    {
        let Console { input, output, terminal } = console;
        let _raw = RawSession::acquire(terminal, self.config.hide_cursor);
        renderer.draw(output, layout, state)?;
        let mut decoder = KeyDecoder::new();

        loop {
            let byte = input.read_byte()?.ok_or(MenuError::InputClosed)?;
            let pending = input.has_pending()?;
            let event = decoder.feed(byte, pending);
            if let Transition::Confirmed(pos) = state.apply(event) {
                write!(output, "\r\n")?;
                output.flush()?;
                return Ok(pos);
            }
            renderer.refresh(output, layout, state)?;
        }
    }

    /// Run the action behind a confirmed position.
    fn dispatch<'m, I, W, T>(
        &'m self,
        console: &mut Console<I, W, T>,
        layout: &Layout<'m>,
        pos: usize,
    ) -> Result<Step<'m>>
    where
        I: InputSource,
        W: Write,
        T: TerminalControl,
    {
        let Some(index) = layout.index_at(pos) else {
            // Only reachable if clamping was bypassed.
            let text = self.config.range_text(layout.first_position(), layout.last_position());
            writeln!(console.output, "{}", text)?;
            console.output.flush()?;
            self.wait_acknowledgment(console)?;
            return Ok(Step::Layout);
        };

        let entry = &self.entries[index];
        if layout.is_terminal(pos) {
            info!("Exit entry '{}' selected", entry.label);
            entry.invoke();
            return Ok(Step::Terminated);
        }

        debug!("Dispatching '{}' (position {})", entry.label, pos);
        writeln!(console.output, "{}", self.config.executing_message)?;
        console.output.flush()?;
        if entry.invoke() {
            writeln!(console.output, "{}", self.config.pause_message)?;
            console.output.flush()?;
            self.wait_acknowledgment(console)?;
        }
        Ok(Step::Layout)
    }

    /// Block until Enter, ignoring every other key.
    fn wait_acknowledgment<I, W, T>(&self, console: &mut Console<I, W, T>) -> Result<()>
    where
        I: InputSource,
        T: TerminalControl,
    {
        let Console { input, terminal, .. } = console;
        let _raw = RawSession::acquire(terminal, self.config.hide_cursor);
        let mut decoder = KeyDecoder::new();

        loop {
            let byte = input.read_byte()?.ok_or(MenuError::InputClosed)?;
            let pending = input.has_pending()?;
            if decoder.feed(byte, pending) == KeyEvent::Confirm {
                return Ok(());
            }
        }
    }
}

impl MenuFrontend for Menu {
    fn run(&self) -> Result<()> {
        Menu::run(self)
    }

    fn info(&self) -> String {
        Menu::info(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::ScriptedInput;
    use crate::core::raw::RecordingTerminal;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type TestConsole = Console<ScriptedInput, Vec<u8>, RecordingTerminal>;

    fn console(input: ScriptedInput) -> TestConsole {
        Console {
            input,
            output: Vec::new(),
            terminal: RecordingTerminal::default(),
        }
    }

    fn config() -> MenuConfig {
        MenuConfig {
            clear_screen: false,
            ..Default::default()
        }
    }

    /// Entry whose action appends its label to `log`.
    fn logged(label: &'static str, log: &Rc<RefCell<Vec<&'static str>>>, pause: bool) -> Entry {
        let log = Rc::clone(log);
        Entry::new(label, move || {
            log.borrow_mut().push(label);
            pause
        })
    }

    fn abc(log: &Rc<RefCell<Vec<&'static str>>>) -> Menu {
        Menu::with_config(
            "Test",
            vec![logged("A", log, false), logged("B", log, false), logged("Exit", log, false)],
            config(),
        )
        .unwrap()
    }

    fn output(console: &TestConsole) -> String {
        String::from_utf8_lossy(&console.output).into_owned()
    }

    #[test]
    fn test_empty_menu_is_rejected() {
        let err = Menu::with_config("Test", Vec::new(), config()).unwrap_err();
        assert!(matches!(err, MenuError::NoEntries));
    }

    #[test]
    fn test_select_then_exit() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = abc(&log);
        let mut console = console(ScriptedInput::keystrokes(b"1\r3\r"));

        menu.run_on(&mut console).unwrap();

        assert_eq!(*log.borrow(), vec!["A", "Exit"]);
        let text = output(&console);
        assert!(text.starts_with("== Test menu ==\r\n"));
        assert_eq!(text.matches("Executing operation ...").count(), 1);
        assert!(!console.terminal.raw);
        assert_eq!(
            console.terminal.calls,
            vec!["raw", "hide", "show", "cooked", "raw", "hide", "show", "cooked"]
        );
    }

    #[test]
    fn test_confirm_without_digits_is_ignored() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = abc(&log);
        let mut console = console(ScriptedInput::keystrokes(b"\r\rx3\r"));

        menu.run_on(&mut console).unwrap();
        assert_eq!(*log.borrow(), vec!["Exit"]);
    }

    #[test]
    fn test_pause_waits_for_enter() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = Menu::with_config(
            "Test",
            vec![logged("A", &log, true), logged("Exit", &log, false)],
            config(),
        )
        .unwrap();
        // Digits typed during the pause do not leak into the next frame.
        let mut console = console(ScriptedInput::keystrokes(b"1\r9x\r2\r"));

        menu.run_on(&mut console).unwrap();

        assert_eq!(*log.borrow(), vec!["A", "Exit"]);
        assert!(output(&console).contains("Press enter to return to menu"));
        assert_eq!(console.terminal.calls.iter().filter(|c| **c == "raw").count(), 3);
    }

    #[test]
    fn test_hidden_entry_shifts_positions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = Menu::with_config(
            "Test",
            vec![
                logged("A", &log, false),
                logged("B", &log, false).visible_when(|| false),
                logged("Exit", &log, false),
            ],
            config(),
        )
        .unwrap();
        let mut console = console(ScriptedInput::keystrokes(b"2\r"));

        menu.run_on(&mut console).unwrap();

        assert_eq!(*log.borrow(), vec!["Exit"]);
        let text = output(&console);
        assert!(text.contains("2 : to Exit"));
        assert!(!text.contains("to B"));
    }

    #[test]
    fn test_visibility_reevaluated_each_cycle() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let unlocked = Rc::new(Cell::new(false));
        let checks = Rc::new(Cell::new(0));

        let unlock = {
            let unlocked = Rc::clone(&unlocked);
            let log = Rc::clone(&log);
            Entry::new("Unlock", move || {
                unlocked.set(true);
                log.borrow_mut().push("Unlock");
                false
            })
        };
        let secret = {
            let unlocked = Rc::clone(&unlocked);
            let checks = Rc::clone(&checks);
            logged("Secret", &log, false).visible_when(move || {
                checks.set(checks.get() + 1);
                unlocked.get()
            })
        };
        let menu = Menu::with_config(
            "Test",
            vec![unlock, secret, logged("Exit", &log, false)],
            config(),
        )
        .unwrap();

        // Frame 1: Unlock, Exit. Frame 2 (seeded "1"): Unlock, Secret, Exit.
        // Backspace clears the seed before picking 2. Frame 3 exits via 3.
        let mut console = console(ScriptedInput::keystrokes(b"1\r\x7f2\r\x7f3\r"));
        menu.run_on(&mut console).unwrap();

        assert_eq!(*log.borrow(), vec!["Unlock", "Secret", "Exit"]);
        assert_eq!(checks.get(), 3);
    }

    #[test]
    fn test_escape_and_arrows() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = abc(&log);
        // Lone ESC clears "1", Up from nothing wraps to the exit entry.
        let mut console = console(ScriptedInput::new(&[b"1", b"\x1b", b"\x1b[A", b"\r"]));

        menu.run_on(&mut console).unwrap();
        assert_eq!(*log.borrow(), vec!["Exit"]);
    }

    #[test]
    fn test_arrow_down_then_select() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = abc(&log);
        let mut console = console(ScriptedInput::new(&[
            b"\x1b[B", b"\x1b[B", b"\r", // B
            b"\x1b[B", b"\r",            // Exit
        ]));

        menu.run_on(&mut console).unwrap();
        assert_eq!(*log.borrow(), vec!["B", "Exit"]);
    }

    #[test]
    fn test_clamped_digit_echoed_in_prompt() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = Menu::with_config(
            "Test",
            vec![logged("A", &log, false), logged("Exit", &log, false)],
            config(),
        )
        .unwrap();
        let mut console = console(ScriptedInput::keystrokes(b"9\r"));

        menu.run_on(&mut console).unwrap();

        let text = output(&console);
        assert!(text.contains("-> 2"));
        assert!(!text.contains("-> 9"));
        assert_eq!(*log.borrow(), vec!["Exit"]);
    }

    #[test]
    fn test_exit_ignores_action_result() {
        let calls = Rc::new(Cell::new(0));
        let exit = {
            let calls = Rc::clone(&calls);
            Entry::new("Exit", move || {
                calls.set(calls.get() + 1);
                true
            })
        };
        let menu = Menu::with_config("Test", vec![exit], config()).unwrap();
        let mut console = console(ScriptedInput::keystrokes(b"1\r"));

        menu.run_on(&mut console).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!output(&console).contains("Press enter"));
    }

    #[test]
    fn test_input_closed_restores_terminal() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = abc(&log);
        let mut console = console(ScriptedInput::keystrokes(b"1"));

        let err = menu.run_on(&mut console).unwrap_err();
        assert!(matches!(err, MenuError::InputClosed));
        assert!(!console.terminal.raw);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_out_of_range_position_reports_and_waits() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let menu = abc(&log);
        let mut console = console(ScriptedInput::keystrokes(b"x\r"));
        let layout = Layout::resolve(menu.title(), menu.entries()).unwrap();

        let next = menu.dispatch(&mut console, &layout, 7).unwrap();

        assert_eq!(next.phase(), Phase::Layout);
        assert!(output(&console).contains("Maximum selection item is 3"));
        assert!(log.borrow().is_empty());
        assert_eq!(console.input.remaining(), 0);
    }

    #[test]
    fn test_info() {
        let menu = Menu::with_config("Test", vec![Entry::new("Exit", || false)], config()).unwrap();
        assert_eq!(menu.info(), "menu using cli");
        assert_eq!(MenuFrontend::info(&menu), "menu using cli");
    }

    /// Terminal sharing its cursor state with [`CursorAwareOutput`].
    struct SharedCursorTerminal(Rc<Cell<bool>>);

    impl TerminalControl for SharedCursorTerminal {
        fn enable_raw(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn disable_raw(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
            self.0.set(!visible);
            Ok(())
        }
    }

    /// Counts bytes written while the cursor was visible.
    struct CursorAwareOutput {
        hidden: Rc<Cell<bool>>,
        visible_bytes: usize,
    }

    impl Write for CursorAwareOutput {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !self.hidden.get() {
                self.visible_bytes += buf.len();
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_frame_drawn_with_cursor_hidden() {
        let menu = Menu::with_config(
            "Test",
            vec![Entry::new("A", || false), Entry::new("Exit", || false)],
            config(),
        )
        .unwrap();
        let hidden = Rc::new(Cell::new(false));
        let mut console = Console {
            input: ScriptedInput::keystrokes(b"2\r"),
            output: CursorAwareOutput {
                hidden: Rc::clone(&hidden),
                visible_bytes: 0,
            },
            terminal: SharedCursorTerminal(Rc::clone(&hidden)),
        };

        menu.run_on(&mut console).unwrap();

        assert_eq!(console.output.visible_bytes, 0);
        assert!(!hidden.get());
    }
}
