//! Error types for climenu.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("No menu entries given")]
    NoEntries,

    #[error("Input stream closed while waiting for a selection")]
    InputClosed,

    #[error("Failed to load config from {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MenuError>;
