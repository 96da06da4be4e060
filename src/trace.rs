use opentelemetry::{
    global,
    trace::{SamplingDecision, SamplingResult, TraceContextExt, TraceState, TracerProvider as _},
    KeyValue,
};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{
    metrics::{MeterProviderBuilder, PeriodicReader, SdkMeterProvider},
    trace::{RandomIdGenerator, SdkTracerProvider, ShouldSample},
    Resource,
};
use tracing::Level;
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::{HatsuonError, Result};

const SERVICE_NAME: &str = "hatsuon";

/// Spans emitted once per comparison; too hot to export.
const DROPPED_SPANS: [&str; 1] = ["overall_score"];

#[derive(Debug, Clone)]
struct FilterSampler;

impl ShouldSample for FilterSampler {
    fn should_sample(
        &self,
        parent_context: Option<&opentelemetry::Context>,
        _trace_id: opentelemetry::TraceId,
        name: &str,
        _span_kind: &opentelemetry::trace::SpanKind,
        _attributes: &[KeyValue],
        _links: &[opentelemetry::trace::Link],
    ) -> opentelemetry::trace::SamplingResult {
        let decision = if DROPPED_SPANS.contains(&name) {
            SamplingDecision::Drop
        } else {
            SamplingDecision::RecordAndSample
        };

        SamplingResult {
            decision,
            attributes: vec![],
            trace_state: match parent_context {
                Some(ctx) => ctx.span().span_context().trace_state().clone(),
                None => TraceState::default(),
            },
        }
    }
}

fn resource() -> Resource {
    Resource::builder().with_service_name(SERVICE_NAME).build()
}

fn init_meter_provider(url: &str) -> Result<SdkMeterProvider> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .with_endpoint(url)
        .with_protocol(Protocol::HttpBinary)
        .with_temporality(opentelemetry_sdk::metrics::Temporality::default())
        .build()
        .map_err(|e| HatsuonError::config(format!("OTLP metric exporter: {}", e)))?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(std::time::Duration::from_secs(5))
        .build();

    let stdout_reader =
        PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default()).build();

    let meter_provider = MeterProviderBuilder::default()
        .with_resource(resource())
        .with_reader(reader)
        .with_reader(stdout_reader)
        .build();

    global::set_meter_provider(meter_provider.clone());

    Ok(meter_provider)
}

fn init_tracer_provider(url: &str) -> Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(url)
        .with_protocol(Protocol::HttpBinary)
        .build()
        .map_err(|e| HatsuonError::config(format!("OTLP span exporter: {}", e)))?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(FilterSampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for score output.
pub fn init_tracing_subscriber(level: Level, otel_http_url: &Option<String>) -> Result<OtelGuard> {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if let Some(url) = otel_http_url {
        let tracer_provider = init_tracer_provider(url)?;
        let meter_provider = init_meter_provider(url)?;

        let tracer = tracer_provider.tracer(SERVICE_NAME);

        registry
            .with(MetricsLayer::new(meter_provider.clone()))
            .with(OpenTelemetryLayer::new(tracer))
            .init();

        Ok(OtelGuard {
            tracer_provider: Some(tracer_provider),
            meter_provider: Some(meter_provider),
        })
    } else {
        registry.init();

        Ok(OtelGuard {
            tracer_provider: None,
            meter_provider: None,
        })
    }
}

/// Flushes exporters when dropped
pub struct OtelGuard {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {e}");
            }
        }
        if let Some(provider) = self.meter_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down meter provider: {e}");
            }
        }
    }
}
