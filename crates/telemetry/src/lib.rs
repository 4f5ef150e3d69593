//! Tracing bootstrap shared by the server and the CLI.

use anyhow::anyhow;
use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` overrides `settings.filter`.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_env_filter(&settings.filter);

    let result = match settings.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
    };
    result.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(
        target: "bookshelf-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

fn build_env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_fallback_filter_degrades_to_info() {
        // Only meaningful when RUST_LOG is not set by the test runner.
        if std::env::var("RUST_LOG").is_err() {
            let filter = build_env_filter("info,bookshelf=notalevel");
            assert_eq!(filter.to_string(), "info");
        }
    }
}
