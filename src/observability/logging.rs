//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Resolve the log filter from environment, flags and config
//!
//! # Design Decisions
//! - `RUST_LOG` wins over everything else
//! - `-v` forces debug for this crate
//! - Otherwise `observability.log_level` applies

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { log_level };
    format!("galera_health={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(log_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(log_level, verbose).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_forces_debug() {
        assert_eq!(
            default_directive("warn", true),
            "galera_health=debug,tower_http=debug"
        );
        assert_eq!(
            default_directive("warn", false),
            "galera_health=warn,tower_http=warn"
        );
    }
}
