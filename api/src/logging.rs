//! Logging setup
//!
//! Console output always; a plain-text log file as well when configured.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, Environment};

/// Default filter when `RUST_LOG` is unset
fn default_directives(environment: Environment) -> &'static str {
    match environment {
        Environment::Production => "info",
        Environment::Development => "info,papamana_api=debug,tower_http=debug",
    }
}

/// Initialize tracing for the server.
///
/// Returns the file writer guard, which must be kept alive for the duration
/// of the program so buffered lines are flushed.
pub fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(config.environment).into());

    let (file_layer, guard) = match config.log_file.as_deref() {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "image_processor.log".into());

            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}
