use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

pub fn run(_args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    let version = env!("CARGO_PKG_VERSION");
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "name": "serlink", "version": version })
        ),
        _ => println!("serlink {version}"),
    }
    Ok(SUCCESS)
}
