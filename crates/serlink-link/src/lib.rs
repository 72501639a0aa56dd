//! The SLIP link layer.
//!
//! A [`Link`] binds one serial line to one streaming decoder: outbound
//! datagrams are framed and written to the line, inbound chunks run through
//! the decoder and each completed datagram is handed to a callback. The
//! [`LinkLayer`] owns a fixed set of links keyed by next-hop address,
//! dispatching sends to the right link and merging every link's deliveries
//! into a single upward stream.

pub mod config;
pub mod error;
pub mod link;
pub mod mux;

pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use link::{DatagramHandler, Link};
pub use mux::LinkLayer;
