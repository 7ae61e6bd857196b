use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "timely=debug", "timely_probe=info,timely=trace").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// Config with an explicit filter, ignoring `RUST_LOG`.
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    /// Filter string the logger will be built with.
    ///
    /// Precedence: explicit `env_filter`, then `RUST_LOG`, then `info`.
    pub fn resolved_filter(&self) -> String {
        self.env_filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string())
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Idempotent; subsequent calls are ignored. Call early in `main`. Library
/// code only emits through the `log` facade and never calls this itself.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&config.resolved_filter());
        builder.write_style(config.write_style);

        // Stopwatch output is sub-second; keep microsecond log stamps.
        builder.format_timestamp_micros();

        // Another logger may already be installed by the host application.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
