use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use serlink_transport::SerialLine;

use crate::config::LinkConfig;
use crate::error::{LinkError, Result};
use crate::link::{DatagramHandler, Link};

type ReceiverSlot = Arc<Mutex<Option<DatagramHandler>>>;

/// The link layer: a fixed set of links keyed by next-hop address.
///
/// Outbound datagrams are dispatched to the link configured for their next
/// hop; datagrams decoded on any link are fanned in to the single registered
/// upper-layer receiver. The address map is built once at construction and
/// never changes.
pub struct LinkLayer {
    links: HashMap<Ipv4Addr, Link>,
    receiver: ReceiverSlot,
    config: LinkConfig,
}

impl LinkLayer {
    /// Build one link per `(next_hop, line)` entry with default config.
    pub fn new(lines: impl IntoIterator<Item = (Ipv4Addr, Box<dyn SerialLine>)>) -> Self {
        Self::with_config(lines, LinkConfig::default())
    }

    /// Build one link per `(next_hop, line)` entry.
    pub fn with_config(
        lines: impl IntoIterator<Item = (Ipv4Addr, Box<dyn SerialLine>)>,
        config: LinkConfig,
    ) -> Self {
        let receiver: ReceiverSlot = Arc::new(Mutex::new(None));
        let mut links = HashMap::new();
        for (next_hop, line) in lines {
            let link = Link::new(line);
            let fan_in = Arc::clone(&receiver);
            link.register_receiver(Box::new(move |datagram| {
                let mut slot = fan_in.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(handler) = slot.as_mut() {
                    handler(datagram);
                } else {
                    trace!(
                        len = datagram.len(),
                        "no upper-layer receiver, dropping datagram"
                    );
                }
            }));
            debug!(%next_hop, line = link.line_name(), "link configured");
            links.insert(next_hop, link);
        }
        Self {
            links,
            receiver,
            config,
        }
    }

    /// Install the upper-layer receiver, replacing any previous one.
    pub fn register_receiver(&self, handler: DatagramHandler) {
        *self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    /// Send `datagram` over the link configured for `next_hop`.
    pub fn send(&self, datagram: &[u8], next_hop: Ipv4Addr) -> Result<()> {
        let link = self
            .links
            .get(&next_hop)
            .ok_or(LinkError::RouteNotFound(next_hop))?;
        link.send(datagram)
    }

    /// Link-layer configuration in effect.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The configured next-hop addresses, in no particular order.
    pub fn next_hops(&self) -> impl Iterator<Item = Ipv4Addr> + '_ {
        self.links.keys().copied()
    }

    /// Number of configured links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// True when no links are configured.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serlink_frame::encode_frame;
    use serlink_transport::LoopbackLine;

    use super::*;

    const HOP_A: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
    const HOP_B: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
    const HOP_UNKNOWN: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 3);

    struct Remote {
        line: LoopbackLine,
        wire: Arc<Mutex<Vec<u8>>>,
    }

    fn remote(line: LoopbackLine) -> Remote {
        let wire = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&wire);
        line.register_receiver(Box::new(move |bytes| {
            sink.lock().unwrap().extend_from_slice(bytes);
        }));
        Remote { line, wire }
    }

    fn two_link_layer() -> (LinkLayer, Remote, Remote) {
        let (near_a, far_a) = LoopbackLine::pair();
        let (near_b, far_b) = LoopbackLine::pair();
        let layer = LinkLayer::new([
            (HOP_A, Box::new(near_a) as Box<dyn SerialLine>),
            (HOP_B, Box::new(near_b) as Box<dyn SerialLine>),
        ]);
        (layer, remote(far_a), remote(far_b))
    }

    fn fan_in_collector(layer: &LinkLayer) -> Arc<Mutex<Vec<Vec<u8>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        layer.register_receiver(Box::new(move |datagram| {
            sink.lock().unwrap().push(datagram.to_vec());
        }));
        seen
    }

    #[test]
    fn send_routes_to_the_configured_link_only() {
        let (layer, remote_a, remote_b) = two_link_layer();

        layer.send(b"to-a", HOP_A).unwrap();

        assert_eq!(
            remote_a.wire.lock().unwrap().as_slice(),
            encode_frame(b"to-a").as_ref()
        );
        assert!(remote_b.wire.lock().unwrap().is_empty());
    }

    #[test]
    fn unknown_next_hop_is_route_not_found_and_sends_nothing() {
        let (layer, remote_a, remote_b) = two_link_layer();

        let err = layer.send(b"lost", HOP_UNKNOWN).unwrap_err();

        assert!(matches!(err, LinkError::RouteNotFound(hop) if hop == HOP_UNKNOWN));
        assert!(remote_a.wire.lock().unwrap().is_empty());
        assert!(remote_b.wire.lock().unwrap().is_empty());
    }

    #[test]
    fn datagrams_from_all_links_fan_in_exactly_once() {
        let (layer, remote_a, remote_b) = two_link_layer();
        let seen = fan_in_collector(&layer);

        remote_a.line.send(&encode_frame(b"from-a")).unwrap();
        remote_b.line.send(&encode_frame(b"from-b")).unwrap();
        remote_a.line.send(&encode_frame(b"again-a")).unwrap();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[b"from-a".to_vec(), b"from-b".to_vec(), b"again-a".to_vec()]
        );
    }

    #[test]
    fn partial_frame_on_one_link_does_not_bleed_into_another() {
        let (layer, remote_a, remote_b) = two_link_layer();
        let seen = fan_in_collector(&layer);

        // Link A receives half a frame; link B a complete one.
        let frame_a = encode_frame(b"interleaved");
        remote_a.line.send(&frame_a[..4]).unwrap();
        remote_b.line.send(&encode_frame(b"whole")).unwrap();
        remote_a.line.send(&frame_a[4..]).unwrap();

        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[b"whole".to_vec(), b"interleaved".to_vec()]
        );
    }

    #[test]
    fn inbound_without_registered_receiver_is_dropped() {
        let (layer, remote_a, _remote_b) = two_link_layer();

        remote_a.line.send(&encode_frame(b"early")).unwrap();

        let seen = fan_in_collector(&layer);
        remote_a.line.send(&encode_frame(b"late")).unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), &[b"late".to_vec()]);
    }

    #[test]
    fn registering_again_replaces_the_receiver() {
        let (layer, remote_a, _remote_b) = two_link_layer();
        let first = fan_in_collector(&layer);
        let second = fan_in_collector(&layer);

        remote_a.line.send(&encode_frame(b"x")).unwrap();

        assert!(first.lock().unwrap().is_empty());
        assert_eq!(second.lock().unwrap().as_slice(), &[b"x".to_vec()]);
    }

    #[test]
    fn accessors_reflect_construction() {
        let (layer, _remote_a, _remote_b) = two_link_layer();
        assert_eq!(layer.len(), 2);
        assert!(!layer.is_empty());
        let mut hops: Vec<Ipv4Addr> = layer.next_hops().collect();
        hops.sort();
        assert_eq!(hops, vec![HOP_A, HOP_B]);
        assert!(!layer.config().ignore_checksum);
    }

    #[test]
    fn config_is_carried() {
        let layer = LinkLayer::with_config(
            std::iter::empty(),
            LinkConfig {
                ignore_checksum: true,
            },
        );
        assert!(layer.config().ignore_checksum);
        assert!(layer.is_empty());
    }
}
