use fieldgw_gateway::{settings_path, GatewaySettings};

use crate::cmd::InitArgs;
use crate::exit::{settings_error, CliResult, SUCCESS};

pub fn run(args: InitArgs) -> CliResult<i32> {
    let path = settings_path(args.config.as_deref());
    GatewaySettings::template()
        .write(&path, args.force)
        .map_err(|err| settings_error("settings template write failed", err))?;

    println!("wrote settings template to {}", path.display());
    Ok(SUCCESS)
}
