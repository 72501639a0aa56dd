use crate::error::Result;

/// Callback invoked with raw octets as they arrive from a line.
///
/// Deliveries are non-empty and arbitrarily chunked: a single call may carry
/// a fraction of a frame or several frames back to back.
pub type RawReceiver = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// A byte-oriented serial line.
///
/// Implementations own whatever device or channel carries the octets; the
/// layers above see only `send` and the receiver callback. Each line has a
/// single receiver registration point; registering again replaces the
/// previous receiver.
pub trait SerialLine: Send + Sync {
    /// Write raw bytes to the line.
    fn send(&self, bytes: &[u8]) -> Result<()>;

    /// Install the callback that receives inbound bytes.
    fn register_receiver(&self, receiver: RawReceiver);

    /// Line kind, for diagnostics.
    fn name(&self) -> &'static str;
}
