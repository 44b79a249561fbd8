//! Logging initialization.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::LoggingConfig;

/// Builds the default filter directive for the configured level.
///
/// `RUST_LOG` overrides this entirely. Otherwise the configured level
/// applies across the service while sqlx statement logging and hyper
/// connection chatter stay at warn.
fn default_filter(level: &str) -> String {
    format!("{level},sqlx=warn,hyper=warn")
}

/// Initializes tracing from the logging config.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.format == "json" {
        // One JSON object per line for log shippers
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_target(true))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_noisy_dependencies() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("debug"));
        assert!(filter.contains("sqlx=warn"));
    }
}
