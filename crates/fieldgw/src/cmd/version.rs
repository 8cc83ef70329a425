use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("fieldgw {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: fieldgw");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("FIELDGW_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "build_profile: {}",
        option_env!("FIELDGW_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("max_frame_size: {}", fieldgw_link::DEFAULT_MAX_FRAME_SIZE);
    println!(
        "telemetry_endpoint: {}",
        fieldgw_telemetry::DEFAULT_BASE_URL
    );

    Ok(SUCCESS)
}
