use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serlink_frame::{END, ESC};
use serlink_link::LinkLayer;
use serlink_transport::{LoopbackLine, SerialLine};
use tracing::{info, warn};

use crate::cmd::DemoArgs;
use crate::exit::{link_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_datagram, OutputFormat};

const HOP_A: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const HOP_B: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
const HOP_UNCONFIGURED: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 99);

/// Two links, each to a loopback remote that echoes raw bytes straight
/// back. Everything sent comes home through the full decode/fan-in path.
pub fn run(args: DemoArgs, format: OutputFormat) -> CliResult<i32> {
    let (near_a, far_a) = LoopbackLine::pair_with_chunk(args.chunk_size);
    let (near_b, far_b) = LoopbackLine::pair_with_chunk(args.chunk_size);
    wire_echo(far_a);
    wire_echo(far_b);

    let layer = LinkLayer::new([
        (HOP_A, Box::new(near_a) as Box<dyn SerialLine>),
        (HOP_B, Box::new(near_b) as Box<dyn SerialLine>),
    ]);

    let delivered = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&delivered);
    layer.register_receiver(Box::new(move |datagram| {
        let index = counter.fetch_add(1, Ordering::SeqCst);
        print_datagram(index, "loopback", &datagram, format);
    }));

    for i in 0..args.count {
        let text = format!("ping {i} via {HOP_A}");
        layer
            .send(text.as_bytes(), HOP_A)
            .map_err(|err| link_error("demo send", err))?;

        // A payload full of reserved octets, to show the escaping at work.
        layer
            .send(&[END, ESC, i as u8], HOP_B)
            .map_err(|err| link_error("demo send", err))?;
    }

    match layer.send(b"nowhere", HOP_UNCONFIGURED) {
        Err(err) => info!(%err, "unconfigured next hop refused as expected"),
        Ok(()) => {
            return Err(CliError::new(
                INTERNAL,
                "send to unconfigured hop unexpectedly succeeded",
            ))
        }
    }

    let delivered = delivered.load(Ordering::SeqCst);
    info!(
        sent = args.count * 2,
        delivered,
        "demo complete"
    );
    if delivered != args.count * 2 {
        warn!("some datagrams did not come back");
        return Ok(crate::exit::FAILURE);
    }

    Ok(SUCCESS)
}

fn wire_echo(line: LoopbackLine) {
    let line = Arc::new(line);
    let handle = Arc::clone(&line);
    line.register_receiver(Box::new(move |bytes| {
        if let Err(err) = handle.send(bytes) {
            warn!(%err, "echo remote failed to send");
        }
    }));
}
