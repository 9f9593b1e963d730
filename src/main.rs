//! climenu demo - a numbered terminal menu
//!
//! Runs a small "Test" menu with two operations and an exit entry.
//!
//! # Quick Start
//!
//! ```text
//! climenu                 # Raw-mode menu (digits, arrows, Esc, Enter)
//! climenu --line          # Line-based menu for pipes and dumb terminals
//! climenu --wait 3000     # Only check whether Enter is pressed within 3s
//! ```

use std::cell::Cell;
use std::env;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::rc::Rc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use climenu::{is_confirm_pending, Entry, LineMenu, Menu, MenuConfig, MenuFrontend};

/// Command line options
#[derive(Debug, Default)]
struct Args {
    /// Explicit configuration file
    config_path: Option<PathBuf>,
    /// Do not clear the screen between frames
    no_clear: bool,
    /// Use the line-based menu
    line: bool,
    /// Run only the confirm-pending check with this timeout
    wait_ms: Option<i32>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("climenu {}", VERSION);
}

fn print_help() {
    eprintln!("climenu {} - numbered menus for text terminals", VERSION);
    eprintln!();
    eprintln!("Usage: climenu [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <PATH>   Configuration file (default: ~/.climenu/config.toml)");
    eprintln!("      --no-clear        Keep previous frames on screen");
    eprintln!("      --line            Line-based menu (no raw mode)");
    eprintln!("      --wait <MS>       Report whether Enter is pressed within MS");
    eprintln!("                        milliseconds (-1 waits forever, 0 polls once)");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Menu keys:");
    eprintln!("  0-9                   Type a position");
    eprintln!("  Backspace             Delete last digit");
    eprintln!("  Up/Down               Move selection");
    eprintln!("  Esc                   Clear selection");
    eprintln!("  Enter                 Run selected entry");
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing config path".to_string());
                }
                parsed.config_path = Some(PathBuf::from(&args[i]));
            }
            "--no-clear" => {
                parsed.no_clear = true;
            }
            "--line" => {
                parsed.line = true;
            }
            "--wait" => {
                i += 1;
                let value = args.get(i).ok_or_else(|| "Missing timeout".to_string())?;
                let ms = value
                    .parse::<i32>()
                    .map_err(|_| format!("Invalid timeout: {}", value))?;
                parsed.wait_ms = Some(ms);
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(parsed)
}

/// Log to `~/.climenu/climenu.log`; RUST_LOG overrides the configured level
fn init_logging(config: &MenuConfig) {
    let log_path = MenuConfig::config_dir()
        .map(|dir| dir.join("climenu.log"))
        .unwrap_or_else(|| PathBuf::from("climenu.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// The demo entries: two operations, the second hidden until the first ran
fn demo_entries() -> Vec<Entry> {
    let first_done = Rc::new(Cell::new(false));

    let first = {
        let first_done = Rc::clone(&first_done);
        Entry::new("Run first operation", move || {
            println!("Operation num 1");
            first_done.set(true);
            true
        })
    };
    let second = {
        let first_done = Rc::clone(&first_done);
        Entry::new("Run second operation", || {
            println!("Operation num 2");
            true
        })
        .visible_when(move || first_done.get())
    };
    let exit = Entry::new("Exit menu", || {
        println!("Cleaning up and exiting");
        false
    });

    vec![first, second, exit]
}

fn main() -> anyhow::Result<()> {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let mut config = match &args.config_path {
        Some(path) => MenuConfig::load_from(path)?,
        None => MenuConfig::load(),
    };
    if args.no_clear {
        config.clear_screen = false;
    }

    init_logging(&config);
    info!("climenu {} starting...", VERSION);

    if let Some(ms) = args.wait_ms {
        let pressed = is_confirm_pending(ms)?;
        println!("{}", if pressed { "Enter pressed" } else { "No key pressed" });
        return Ok(());
    }

    // Raw mode needs a real terminal on stdin.
    let menu: Box<dyn MenuFrontend> = if args.line || !io::stdin().is_terminal() {
        Box::new(LineMenu::with_config("Test", demo_entries(), config)?)
    } else {
        Box::new(Menu::with_config("Test", demo_entries(), config)?)
    };

    info!("Using {}", menu.info());
    menu.run()?;

    info!("climenu exiting");
    Ok(())
}
