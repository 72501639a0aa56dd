use std::io::Read;

use serlink_frame::Decoder;
use tracing::{info, warn};

use crate::cmd::{parse_hex, DecodeArgs};
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_datagram, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let wire = read_wire(&args)?;
    let mut decoder = Decoder::new();
    let mut index = 0usize;

    let chunk_size = args.chunk_size.unwrap_or(0);
    let chunks: Box<dyn Iterator<Item = &[u8]> + '_> = if chunk_size == 0 {
        Box::new(std::iter::once(&wire[..]))
    } else {
        Box::new(wire.chunks(chunk_size))
    };

    for chunk in chunks {
        for datagram in decoder.decode(chunk) {
            print_datagram(index, "stream", &datagram, format);
            index += 1;
        }
    }

    if decoder.has_partial() {
        warn!("input ended mid-frame; partial data discarded");
    }
    info!(datagrams = index, "decode complete");

    Ok(SUCCESS)
}

fn read_wire(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    if let Some(hex) = &args.hex {
        parse_hex(hex)
    } else if let Some(file) = &args.file {
        std::fs::read(file).map_err(|err| io_error("reading wire file", err))
    } else {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error("reading stdin", err))?;
        Ok(buf)
    }
}
