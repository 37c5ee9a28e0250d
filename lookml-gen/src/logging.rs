//! Logging utilities and subscriber setup.
//!
//! The library only emits `tracing` events; binaries decide where they go
//! through [`setup::init_logging`].

/// Truncates a value for logging, appending a marker when cut.
///
/// Cuts on a character boundary, so multi-byte labels are safe.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Subscriber configuration and initialization.
pub mod setup {
    use tracing::Level;

    /// Configuration for the global tracing subscriber.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for dependencies
        pub level: Level,
        /// Log level for this crate
        pub crate_level: Level,
        /// Whether to use JSON output format
        pub json_format: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::WARN,
                crate_level: Level::INFO,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Warnings only, as JSON.
        pub fn production() -> Self {
            Self {
                level: Level::WARN,
                crate_level: Level::WARN,
                json_format: true,
                env_filter: None,
            }
        }

        /// Per-column and per-rule decisions included.
        pub fn development() -> Self {
            Self {
                level: Level::INFO,
                crate_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        pub fn with_crate_level(mut self, level: Level) -> Self {
            self.crate_level = level;
            self
        }

        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},lookml_gen={}",
                    self.level.as_str().to_lowercase(),
                    self.crate_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global subscriber writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the configured filter. Fails if a
    /// global subscriber is already installed.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use lookml_gen::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;

        Ok(())
    }
}
