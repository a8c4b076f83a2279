//! altherma-client polling entry point.
//!
//! Connects to the adapter named by `ALTHERMA_HOST` and logs a device-info
//! snapshot every poll interval until interrupted.

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;

use altherma_client::config::{ClientConfig, LogFormat};
use altherma_client::domain::DeviceInfo;
use altherma_client::service::AlthermaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ClientConfig::from_env().map_err(|e| anyhow!(e.to_string()))?;

    // Initialize tracing
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, "starting altherma-client");

    let mut client = AlthermaClient::new();
    client
        .connect(&config.host)
        .await
        .with_context(|| format!("connecting to {}", config.host))?;

    let result = poll(&mut client, &config).await;

    if let Err(e) = client.close().await {
        tracing::warn!(error = %e, "closing handshake failed");
    }
    result
}

async fn poll(client: &mut AlthermaClient, config: &ClientConfig) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(config.poll_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, shutting down");
                return Ok(());
            }
        }

        // A timed-out request leaves the connection unusable, so give up
        // instead of polling again.
        let info = tokio::time::timeout(config.request_timeout, client.get_device_info())
            .await
            .context("device info request timed out")?
            .context("device info request failed")?;
        report(&info);
    }
}

fn report(info: &DeviceInfo) {
    tracing::info!(
        adapter_model = %info.adapter_model,
        outdoor_temperature = info.outdoor_temperature,
        indoor_temperature = info.indoor_temperature,
        leaving_water_temperature = info.leaving_water_temperature,
        target_temperature = ?info.target_temperature,
        power_state = %info.power_state,
        "device info"
    );
    if info.has_fault() {
        tracing::warn!(
            emergency_state = info.emergency_state,
            error_state = info.error_state,
            warning_state = info.warning_state,
            "unit reports a fault"
        );
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}
