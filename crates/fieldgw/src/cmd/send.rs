use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use fieldgw_frame::{encode_readings, hex, tokenize};
use fieldgw_link::{LinkConfig, UdpLink};

use crate::cmd::{build_runtime, SendArgs};
use crate::exit::{
    decode_error, encode_error, hex_error, link_error, CliError, CliResult, SUCCESS, USAGE,
};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let frame = build_frame(&args)?;

    let local: SocketAddr = if args.addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let config = LinkConfig {
        bind: local,
        max_frame_size: args.max_frame_size,
        ..LinkConfig::default()
    };
    config
        .validate()
        .map_err(|msg| CliError::new(USAGE, format!("invalid --max-frame-size: {msg}")))?;

    let runtime = build_runtime()?;
    runtime.block_on(async {
        let link = UdpLink::bind(config)
            .await
            .map_err(|err| link_error("bind failed", err))?;
        link.send_frame(args.addr, &frame)
            .await
            .map_err(|err| link_error("send failed", err))
    })?;

    tracing::info!(addr = %args.addr, size = frame.len(), "frame sent");
    Ok(SUCCESS)
}

fn build_frame(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(raw) = &args.raw {
        return hex::decode(raw).map_err(|err| hex_error("invalid --raw hex", err));
    }

    let (Some(device), Some(readings)) = (&args.device, &args.readings) else {
        return Err(CliError::new(
            USAGE,
            "either --raw or both --device and --readings are required",
        ));
    };

    let device_id = hex::decode(device).map_err(|err| hex_error("invalid --device hex", err))?;
    let readings = tokenize(readings).map_err(|err| decode_error("invalid --readings", err))?;
    if readings.is_empty() {
        return Err(CliError::new(USAGE, "--readings contains no readings"));
    }

    encode_readings(&device_id, &readings)
        .map(|frame| frame.to_vec())
        .map_err(|err| encode_error("cannot encode frame", err))
}
