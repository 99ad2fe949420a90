//! # FX Gateway
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the Frankfurter provider adapter
//! - Create the rate service and its cache sweeper
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_hex::{RateService, inbound::HttpServer};
use fx_upstream::FrankfurterClient;

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("fx-gateway"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize OpenTelemetry tracing when a collector is configured
    let otel = config
        .otlp_endpoint
        .as_deref()
        .map(init_tracer)
        .transpose()?;
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,fx_app=debug,fx_hex=debug,fx_upstream=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    tracing::info!("Starting FX gateway on port {}", config.port);
    tracing::info!("Using rate provider: {}", config.frankfurter_base_url);
    tracing::debug!(?config, "Loaded configuration");

    // Build the provider adapter
    let provider = FrankfurterClient::new(config.frankfurter_base_url.clone())
        .with_retry_policy(config.retry.clone());

    // Create the rate service
    let service = RateService::with_config(provider, config.service_config());
    let server = HttpServer::new(service);

    // Start the cache sweeper in background
    if let Some(interval) = config.sweep_interval {
        tokio::spawn(server.service().cache_sweeper(interval).run());
    }

    let addr = format!("0.0.0.0:{}", config.port);
    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
