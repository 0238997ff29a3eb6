use shopfront_core::{LogFormat, ServerConfig};
use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "shopfront=debug,tower_http=debug";

/// Initialize tracing.
///
/// Console output uses the compact format; `RUST_LOG` overrides the default
/// filter and `LOG_FORMAT=json` switches to structured JSON lines.
pub fn init_telemetry(server: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    if server.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()?;
    }

    tracing::info!(
        environment = %server.environment,
        log_format = ?server.log_format,
        "Tracing initialized"
    );
    Ok(())
}
