use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, DATA_INVALID};
use crate::output::OutputFormat;

pub mod decode;
pub mod demo;
pub mod encode;
#[cfg(unix)]
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a datagram into a SLIP frame.
    Encode(EncodeArgs),
    /// Decode SLIP frames from a byte stream.
    Decode(DecodeArgs),
    /// Route datagrams across two in-process loopback links.
    Demo(DemoArgs),
    /// Attach links to serial devices and print received datagrams.
    #[cfg(unix)]
    Run(RunArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Demo(args) => demo::run(args, format),
        #[cfg(unix)]
        Command::Run(args) => run::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Hex payload (whitespace allowed).
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["data", "hex"])]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex wire bytes (whitespace allowed).
    #[arg(long, conflicts_with = "file")]
    pub hex: Option<String>,
    /// Read wire bytes from file.
    #[arg(long, conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// Feed the decoder in chunks of at most this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Datagrams to send over each link.
    #[arg(long, default_value = "3")]
    pub count: usize,
    /// Loopback delivery chunk size (exercises frame reassembly).
    #[arg(long, value_name = "BYTES", default_value = "5")]
    pub chunk_size: usize,
}

#[cfg(unix)]
#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON link map: {"links": {"10.0.0.1": "/dev/pts/3"}}.
    pub config: PathBuf,
    /// Echo received datagrams back (single-link maps only).
    #[arg(long)]
    pub echo: bool,
    /// Exit after receiving N datagrams.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {}

/// Parse hex input, ignoring any whitespace between digits.
pub fn parse_hex(input: &str) -> CliResult<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        return Err(CliError::new(
            DATA_INVALID,
            "hex input must have an even number of digits",
        ));
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&cleaned[i..i + 2], 16).map_err(|_| {
                CliError::new(
                    DATA_INVALID,
                    format!("invalid hex digits at offset {i}: {}", &cleaned[i..i + 2]),
                )
            })
        })
        .collect()
}
