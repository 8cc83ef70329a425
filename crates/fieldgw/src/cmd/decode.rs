use fieldgw_frame::{decode, hex};

use crate::cmd::DecodeArgs;
use crate::exit::{decode_error, hex_error, CliResult, SUCCESS};
use crate::output::{render_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let raw = hex::decode(&args.frame).map_err(|err| hex_error("invalid frame hex", err))?;
    let message = decode(&raw).map_err(|err| decode_error("decode failed", err))?;

    println!("{}", render_decoded(&raw, &message, format));
    Ok(SUCCESS)
}
