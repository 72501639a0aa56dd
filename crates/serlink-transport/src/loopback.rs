use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::error::Result;
use crate::traits::{RawReceiver, SerialLine};

type ReceiverSlot = Arc<Mutex<Option<RawReceiver>>>;

/// One end of a coupled in-process line pair.
///
/// Bytes sent on one end are delivered synchronously to the receiver
/// registered on the other end. With a chunk size set, each send is split
/// into multiple deliveries, which exercises chunk-boundary handling in the
/// layers above.
pub struct LoopbackLine {
    local: ReceiverSlot,
    remote: ReceiverSlot,
    chunk: usize,
}

impl LoopbackLine {
    /// Create a connected pair of lines.
    pub fn pair() -> (LoopbackLine, LoopbackLine) {
        Self::pair_with_chunk(0)
    }

    /// Create a connected pair that delivers in chunks of at most `chunk`
    /// bytes. A chunk size of 0 delivers each send whole.
    pub fn pair_with_chunk(chunk: usize) -> (LoopbackLine, LoopbackLine) {
        let a: ReceiverSlot = Arc::new(Mutex::new(None));
        let b: ReceiverSlot = Arc::new(Mutex::new(None));
        (
            LoopbackLine {
                local: Arc::clone(&a),
                remote: Arc::clone(&b),
                chunk,
            },
            LoopbackLine {
                local: b,
                remote: a,
                chunk,
            },
        )
    }
}

impl SerialLine for LoopbackLine {
    fn send(&self, bytes: &[u8]) -> Result<()> {
        let mut slot = self
            .remote
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(receiver) = slot.as_mut() else {
            trace!(len = bytes.len(), "no receiver on loopback peer, dropping");
            return Ok(());
        };
        if self.chunk == 0 {
            receiver(bytes);
        } else {
            for piece in bytes.chunks(self.chunk) {
                receiver(piece);
            }
        }
        Ok(())
    }

    fn register_receiver(&self, receiver: RawReceiver) {
        *self.local.lock().unwrap_or_else(PoisonError::into_inner) = Some(receiver);
    }

    fn name(&self) -> &'static str {
        "loopback"
    }
}
