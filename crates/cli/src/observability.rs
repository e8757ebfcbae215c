//! Tracing subscriber and optional OpenTelemetry export.
//!
//! - Level comes from `RUST_LOG`. Without it the default is `info`, or
//!   `debug` when the workflow was re-run with debug logging (`RUNNER_DEBUG=1`).
//! - Output goes to stderr, compact by default or JSON when
//!   `SPONSOR_GATE_LOG_FORMAT=json`.
//! - When `OTEL_EXPORTER_OTLP_ENDPOINT` is set, spans are also exported over
//!   OTLP/gRPC. The exporter reads the rest of its settings from the standard
//!   `OTEL_*` variables.

use anyhow::Result;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{runtime, Resource};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const SERVICE_NAME: &str = "sponsor-gate";

/// Keeps the OTLP pipeline alive until [`Telemetry::shutdown`].
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Flushes buffered spans. Call once, right before exiting.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(error) = provider.shutdown() {
                eprintln!("failed to flush OpenTelemetry spans: {error}");
            }
        }
    }
}

fn default_level(runner_debug: Option<&str>) -> &'static str {
    if runner_debug == Some("1") {
        "debug"
    } else {
        "info"
    }
}

fn otlp_provider() -> Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            SERVICE_NAME,
        )]))
        .build())
}

/// Installs the global subscriber. Must be called from within the Tokio runtime.
pub fn init() -> Telemetry {
    let runner_debug = std::env::var("RUNNER_DEBUG").ok();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(runner_debug.as_deref())));

    let fmt_layer = match std::env::var("SPONSOR_GATE_LOG_FORMAT").as_deref() {
        Ok("json") => fmt::layer().json().with_writer(std::io::stderr).boxed(),
        _ => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    let (provider, otlp_error) = if std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        match otlp_provider() {
            Ok(provider) => (Some(provider), None),
            Err(error) => (None, Some(error)),
        }
    } else {
        (None, None)
    };
    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(SERVICE_NAME)));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(otel_layer)
        .with(filter)
        .init();

    if let Some(error) = otlp_error {
        tracing::warn!(%error, "OpenTelemetry export disabled");
    }

    Telemetry { provider }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_debug_raises_default_level() {
        assert_eq!(default_level(Some("1")), "debug");
        assert_eq!(default_level(Some("0")), "info");
        assert_eq!(default_level(None), "info");
    }
}
