use std::path::PathBuf;

/// Errors that can occur on a serial line.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the serial device.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The line no longer accepts bytes.
    #[error("serial line closed")]
    Closed,

    /// An I/O error occurred on the line.
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
