use std::io::Read;

use serlink_frame::encode_frame;

use crate::cmd::{parse_hex, EncodeArgs};
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{hex_string, print_raw, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = read_payload(&args)?;
    let frame = encode_frame(&payload);

    match format {
        OutputFormat::Raw => print_raw(&frame),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "payload_size": payload.len(),
                "frame_size": frame.len(),
                "frame": hex_string(&frame),
            })
        ),
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", hex_string(&frame)),
    }

    Ok(SUCCESS)
}

fn read_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        Ok(data.clone().into_bytes())
    } else if let Some(hex) = &args.hex {
        parse_hex(hex)
    } else if let Some(file) = &args.file {
        std::fs::read(file).map_err(|err| io_error("reading payload file", err))
    } else {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|err| io_error("reading stdin", err))?;
        Ok(buf)
    }
}
