//! Serial-line transport abstraction.
//!
//! A serial line carries an undifferentiated stream of octets: it can
//! [`send`](SerialLine::send) raw bytes and delivers whatever arrives to a
//! registered receiver callback, in arbitrary chunks, with no framing of its
//! own. Framing is the job of the layers above.
//!
//! This is the lowest layer of serlink. Two concrete lines are provided:
//! - [`LoopbackLine`] — a coupled in-process pair, for tests and demos
//! - [`TtyLine`] — a character device (PTY, USB serial) with a pump thread

pub mod error;
pub mod loopback;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use error::{Result, TransportError};
pub use loopback::LoopbackLine;
pub use traits::{RawReceiver, SerialLine};

#[cfg(unix)]
pub use tty::TtyLine;
