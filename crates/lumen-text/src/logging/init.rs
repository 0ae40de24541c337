use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, for example
/// `"lumen_text=debug"` to see every font candidate the loader rejects.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness capture instead of stderr.
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger.
///
/// Idempotent. A logger installed by someone else is left in place.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.env_filter {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => match std::env::var("RUST_LOG") {
                Ok(filter) => {
                    builder.parse_filters(&filter);
                }
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Info);
                }
            },
        }

        builder.write_style(config.write_style).is_test(config.is_test);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
