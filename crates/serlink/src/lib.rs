//! SLIP framing and link-layer multiplexing over serial lines.
//!
//! serlink frames opaque datagrams for transmission over byte-oriented
//! serial transports and demultiplexes a set of such links behind a single
//! send/receive surface keyed by next-hop address.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial-line abstraction (loopback pairs, tty devices)
//! - [`frame`] — SLIP byte-stuffing codec with a streaming decoder
//! - [`link`] — Per-line links and the next-hop multiplexer

/// Re-export transport types.
pub mod transport {
    pub use serlink_transport::*;
}

/// Re-export frame codec types.
pub mod frame {
    pub use serlink_frame::*;
}

/// Re-export link-layer types.
pub mod link {
    pub use serlink_link::*;
}
