use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, trace, warn};

use crate::error::{Result, TransportError};
use crate::traits::{RawReceiver, SerialLine};

const READ_CHUNK_SIZE: usize = 4 * 1024;

type ReceiverSlot = Arc<Mutex<Option<RawReceiver>>>;

/// A serial line backed by a character device (PTY slave, USB serial, FIFO).
///
/// Writes go straight to the device. A pump thread reads inbound bytes in
/// chunks and hands each chunk to the registered receiver; the pump ends at
/// end of stream or on a read error, never by panicking. Bytes that arrive
/// before a receiver is registered are dropped.
pub struct TtyLine {
    writer: File,
    path: PathBuf,
    receiver: ReceiverSlot,
}

impl TtyLine {
    /// Open the device at `path` for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;
        Self::from_device(device, path)
    }

    /// Wrap an already-opened device. `path` is used for diagnostics only.
    pub fn from_device(device: File, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let reader = device.try_clone().map_err(|source| TransportError::Open {
            path: path.clone(),
            source,
        })?;

        let receiver: ReceiverSlot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&receiver);
        let pump_path = path.clone();
        std::thread::Builder::new()
            .name("serlink-tty-pump".into())
            .spawn(move || pump(reader, slot, pump_path))
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;

        info!(?path, "opened serial line");

        Ok(Self {
            writer: device,
            path,
            receiver,
        })
    }

    /// The device path this line is attached to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn pump(mut reader: File, slot: ReceiverSlot, path: PathBuf) {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => {
                info!(?path, "serial line reached end of stream");
                return;
            }
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!(?path, error = %err, "serial line read failed, stopping pump");
                return;
            }
        };

        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(receiver) => receiver(&chunk[..read]),
            None => trace!(?path, len = read, "no receiver registered, dropping bytes"),
        }
    }
}

impl SerialLine for TtyLine {
    fn send(&self, bytes: &[u8]) -> Result<()> {
        (&self.writer)
            .write_all(bytes)
            .map_err(|err| match err.kind() {
                ErrorKind::WriteZero => TransportError::Closed,
                _ => TransportError::Io(err),
            })?;
        (&self.writer).flush()?;
        Ok(())
    }

    fn register_receiver(&self, receiver: RawReceiver) {
        *self.receiver.lock().unwrap_or_else(PoisonError::into_inner) = Some(receiver);
    }

    fn name(&self) -> &'static str {
        "tty"
    }
}

impl std::fmt::Debug for TtyLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyLine").field("path", &self.path).finish()
    }
}
