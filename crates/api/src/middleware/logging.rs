//! Tracing subscriber setup.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Output shapes understood by the `logging.format` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than "json" renders as pretty output.
    fn from_setting(format: &str) -> Self {
        if format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level when set, so a deployment
/// can be turned verbose without touching its config files.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_setting(&config.format) {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_span_events(FmtSpan::CLOSE))
            .init(),
    }
}
