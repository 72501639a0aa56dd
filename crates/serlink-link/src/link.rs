use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tracing::{error, trace};

use serlink_frame::{encode_frame, Decoder};
use serlink_transport::SerialLine;

use crate::error::Result;

/// Callback receiving each decoded datagram.
pub type DatagramHandler = Box<dyn FnMut(Bytes) + Send + 'static>;

struct LinkShared {
    decoder: Decoder,
    receiver: Option<DatagramHandler>,
}

/// One link: a serial line plus the decoder state for its inbound stream.
///
/// The line is exclusively owned for the lifetime of the link. Inbound
/// chunks are decoded under a per-link lock, so a transport may deliver from
/// its own thread; distinct links share no state. Upward delivery is
/// synchronous, so a slow receiver stalls only this link's decode path.
pub struct Link {
    line: Box<dyn SerialLine>,
    shared: Arc<Mutex<LinkShared>>,
}

impl Link {
    /// Take ownership of `line` and wire its raw-byte deliveries into a
    /// fresh decoder.
    pub fn new(line: Box<dyn SerialLine>) -> Self {
        let shared = Arc::new(Mutex::new(LinkShared {
            decoder: Decoder::new(),
            receiver: None,
        }));

        let hook = Arc::clone(&shared);
        line.register_receiver(Box::new(move |chunk| {
            let mut guard = hook.lock().unwrap_or_else(PoisonError::into_inner);
            let LinkShared { decoder, receiver } = &mut *guard;
            for datagram in decoder.decode(chunk) {
                let Some(handler) = receiver.as_mut() else {
                    trace!(len = datagram.len(), "datagram with no receiver, dropping");
                    continue;
                };
                // A failing receiver must not take the decoder down with it.
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(datagram))) {
                    error!(panic = panic_message(&payload), "datagram receiver panicked");
                }
            }
        }));

        Self { line, shared }
    }

    /// Frame `datagram` and hand it to the line.
    pub fn send(&self, datagram: &[u8]) -> Result<()> {
        let frame = encode_frame(datagram);
        trace!(
            line = self.line.name(),
            payload_len = datagram.len(),
            frame_len = frame.len(),
            "sending frame"
        );
        self.line.send(&frame)?;
        Ok(())
    }

    /// Install the datagram receiver, replacing any previous one.
    pub fn register_receiver(&self, receiver: DatagramHandler) {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .receiver = Some(receiver);
    }

    /// Kind of the underlying line, for diagnostics.
    pub fn line_name(&self) -> &'static str {
        self.line.name()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
