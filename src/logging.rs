use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where log lines go: (stdout, file). A JSON file log replaces stdout.
fn outputs(config: &AppConfig) -> (bool, bool) {
    let file = config.log_to_file;
    (!(file && config.use_json), file)
}

fn appender(config: &AppConfig) -> RollingFileAppender {
    match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit,
/// dropping it flushes the file writer.
pub fn init_logging(config: &AppConfig) -> Option<WorkerGuard> {
    let (to_stdout, to_file) = outputs(config);
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if to_file {
        let (writer, file_guard) = tracing_appender::non_blocking(appender(config));
        guard = Some(file_guard);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        layers.push(if config.use_json {
            layer.json().with_target(true).boxed()
        } else {
            layer.with_target(false).boxed()
        });
    }

    if to_stdout {
        let layer = fmt::layer();
        layers.push(if config.use_json {
            layer.json().with_target(true).boxed()
        } else {
            layer.with_target(false).with_ansi(true).boxed()
        });
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();

    guard
}
