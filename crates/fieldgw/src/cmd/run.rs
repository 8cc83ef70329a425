use std::sync::Arc;

use fieldgw_gateway::{settings_path, Dispatcher, Gateway, GatewaySettings};
use fieldgw_link::UdpLink;
use fieldgw_telemetry::{AdafruitIoClient, LogOnlyClient, TelemetryClient};
use tokio_util::sync::CancellationToken;

use crate::cmd::{build_runtime, RunArgs};
use crate::exit::{gateway_error, link_error, publish_error, settings_error, CliResult, SUCCESS};

pub fn run(args: RunArgs) -> CliResult<i32> {
    let path = settings_path(args.config.as_deref());
    let mut settings =
        GatewaySettings::load(&path).map_err(|err| settings_error("settings load failed", err))?;
    if let Some(bind) = args.bind {
        settings.link.bind = bind;
    }
    settings.log_summary();

    let runtime = build_runtime()?;
    runtime.block_on(serve(settings, args.dry_run))
}

async fn serve(settings: GatewaySettings, dry_run: bool) -> CliResult<i32> {
    let client: Arc<dyn TelemetryClient> = if dry_run {
        Arc::new(LogOnlyClient)
    } else {
        Arc::new(
            AdafruitIoClient::new(&settings.telemetry)
                .map_err(|err| publish_error("telemetry client setup failed", err))?,
        )
    };

    let link = UdpLink::bind(settings.link.clone())
        .await
        .map_err(|err| link_error("radio bridge bind failed", err))?;
    let dispatcher = Dispatcher::new(client, settings.publish_target());

    let cancel = CancellationToken::new();
    install_shutdown_handler(cancel.clone());

    Gateway::new(link, dispatcher)
        .run(cancel)
        .await
        .map_err(|err| gateway_error("gateway failed", err))?;

    Ok(SUCCESS)
}

fn install_shutdown_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutdown requested");
                cancel.cancel();
            }
            Err(err) => tracing::warn!(error = %err, "signal handler setup failed"),
        }
    });
}
