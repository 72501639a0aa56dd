use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serlink_link::{LinkConfig, LinkLayer};
use serlink_transport::{SerialLine, TtyLine};
use tracing::{info, warn};

use crate::cmd::RunArgs;
use crate::exit::{
    io_error, transport_error, CliError, CliResult, DATA_INVALID, INTERNAL, SUCCESS, USAGE,
};
use crate::output::{print_datagram, OutputFormat};

/// On-disk link map.
#[derive(Debug, Deserialize)]
struct LinkMap {
    /// Next-hop address to serial device path.
    links: HashMap<Ipv4Addr, PathBuf>,
    #[serde(default)]
    ignore_checksum: bool,
}

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let raw = std::fs::read_to_string(&args.config)
        .map_err(|err| io_error("reading link map", err))?;
    let map: LinkMap = serde_json::from_str(&raw)
        .map_err(|err| CliError::new(DATA_INVALID, format!("parsing link map: {err}")))?;

    if map.links.is_empty() {
        return Err(CliError::new(USAGE, "link map configures no links"));
    }
    let echo_hop = if args.echo {
        if map.links.len() != 1 {
            return Err(CliError::new(
                USAGE,
                "--echo requires a link map with exactly one link",
            ));
        }
        map.links.keys().next().copied()
    } else {
        None
    };

    let mut lines: Vec<(Ipv4Addr, Box<dyn SerialLine>)> = Vec::new();
    for (next_hop, path) in &map.links {
        let line =
            TtyLine::open(path).map_err(|err| transport_error("opening serial line", err))?;
        info!(%next_hop, path = %line.path().display(), "link attached");
        lines.push((*next_hop, Box::new(line)));
    }

    let layer = Arc::new(LinkLayer::with_config(
        lines,
        LinkConfig {
            ignore_checksum: map.ignore_checksum,
        },
    ));

    let received = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&received);
    let echo_layer = echo_hop.map(|hop| (Arc::clone(&layer), hop));
    layer.register_receiver(Box::new(move |datagram| {
        let index = counter.fetch_add(1, Ordering::SeqCst);
        print_datagram(index, "link", &datagram, format);
        if let Some((layer, hop)) = &echo_layer {
            if let Err(err) = layer.send(&datagram, *hop) {
                warn!(%err, "echo send failed");
            }
        }
    }));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(Arc::clone(&running))?;

    while running.load(Ordering::SeqCst) {
        if let Some(limit) = args.count {
            if received.load(Ordering::SeqCst) >= limit {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    info!(
        received = received.load(Ordering::SeqCst),
        "shutting down"
    );
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
