//! Log output for the dispatcher and registry.
//!
//! Every dispatched request opens a `request` span under
//! [`DISPATCH_TARGET`](crate::DISPATCH_TARGET) carrying `method`, `ajax` and
//! `forward`. Registry and batch events logged while the request runs inherit
//! those fields: JSON output embeds the current span in each event and compact
//! output prefixes it. Span closes are logged so request duration is visible.

use std::io::{self, IsTerminal};

use clickclick_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

/// Describes the subscriber installed for this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle {
    format: LogFormat,
}

impl TelemetryHandle {
    /// Format chosen by the call that installed the subscriber.
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format
    }
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid filter directive list.
    #[error("invalid log filter '{filter}': {message}")]
    Filter { filter: String, message: String },
    /// A subscriber not installed by this module is already active.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

/// Installs the process-wide subscriber described by `config`.
///
/// The first successful call wins; later calls return its handle unchanged,
/// even when `config` asks for a different format.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter does not parse or another
/// subscriber is already active.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).copied()
}

fn request_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter()).map_err(|error| TelemetryError::Filter {
        filter: config.log_filter().to_owned(),
        message: error.to_string(),
    })
}

fn install(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let filter = request_filter(config)?;
    let ansi = io::stderr().is_terminal();

    let (json, compact) = match config.log_format() {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(io::stderr),
            ),
            None,
        ),
        LogFormat::Compact => (
            None,
            Some(
                fmt::layer()
                    .compact()
                    .with_ansi(ansi)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .try_init()?;

    Ok(TelemetryHandle {
        format: config.log_format(),
    })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests use expect to surface installation failures"
)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_names_the_directive() {
        let config = Config {
            log_filter: "clickclick_core=loudest".to_owned(),
            ..Config::default()
        };
        let error = request_filter(&config).expect_err("filter must not parse");
        assert!(
            matches!(error, TelemetryError::Filter { ref filter, .. } if filter == "clickclick_core=loudest")
        );
    }

    #[test]
    fn first_installation_wins() {
        let compact = Config {
            log_filter: "clickclick_core=debug".to_owned(),
            log_format: LogFormat::Compact,
            ..Config::default()
        };
        let first = initialise(&compact).expect("subscriber installs");
        assert_eq!(first.format(), LogFormat::Compact);

        let json = Config::default();
        let second = initialise(&json).expect("repeat call succeeds");
        assert_eq!(second, first);
    }
}
