use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Debug, Clone, Default, clap::ValueEnum, PartialEq, Eq)]
pub enum TracingTarget {
    #[default]
    None,
    Jaeger,
}

/// Initializes `tracing` logging with options from the environment variable
/// given in the `env` parameter.
///
/// The variable name is chosen per binary, e.g. `SPARK_K8S_AIRFLOW_LOG`.
/// If the variable is unset or invalid, `log_level` is used as the filter.
pub fn initialize_logging(env: &str, app_name: &str, tracing_target: TracingTarget, log_level: &str) {
    let filter = match EnvFilter::try_from_env(env) {
        Ok(env_filter) => env_filter,
        _ => EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = Registry::default().with(filter).with(fmt);

    match tracing_target {
        TracingTarget::None => registry.init(),

        TracingTarget::Jaeger => {
            let jaeger = opentelemetry_jaeger::new_agent_pipeline()
                .with_service_name(app_name)
                .install_batch(opentelemetry::runtime::Tokio)
                .expect("Failed to initialize Jaeger pipeline");
            let opentelemetry = tracing_opentelemetry::layer().with_tracer(jaeger);
            registry.with(opentelemetry).init();
        }
    }
}

/// Flushes pending spans when an exporter was installed.
pub fn shutdown_logging(tracing_target: &TracingTarget) {
    if *tracing_target == TracingTarget::Jaeger {
        opentelemetry::global::shutdown_tracer_provider();
    }
}
