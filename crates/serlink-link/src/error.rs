use std::net::Ipv4Addr;

/// Errors that can occur in link-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// No link is configured for the requested next hop.
    #[error("no link configured for next hop {0}")]
    RouteNotFound(Ipv4Addr),

    /// The underlying serial line rejected a send.
    #[error("transport error: {0}")]
    Transport(#[from] serlink_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
