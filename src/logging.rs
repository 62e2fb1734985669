//! `env_logger` setup
//!
//! Filter precedence: the settings file, then `RUST_LOG`, then `info`.
//! Output goes to stderr so it can be redirected away from the terminal
//! display (`lcd-pong 2>game.log`).

use std::sync::Once;

use env_logger::{Builder, Target};

const DEFAULT_FILTER: &str = "info";

/// Logger configuration
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. "lcd_pong=debug"
    pub env_filter: Option<String>,
}

/// Directives to install, given the configured and environment filters
fn filter_directives(configured: Option<String>, env: Option<String>) -> String {
    configured
        .or(env)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Install the global logger. Only the first call has any effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let directives = filter_directives(config.env_filter, std::env::var("RUST_LOG").ok());
        let installed = Builder::new()
            .parse_filters(&directives)
            .target(Target::Stderr)
            .try_init();

        // A test harness may own the logger already
        if installed.is_ok() {
            log::debug!("Logging to stderr with filter {:?}", directives);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_filter_wins() {
        let f = filter_directives(Some("debug".into()), Some("warn".into()));
        assert_eq!(f, "debug");
    }

    #[test]
    fn test_env_then_default() {
        assert_eq!(filter_directives(None, Some("warn".into())), "warn");
        assert_eq!(filter_directives(None, None), DEFAULT_FILTER);
    }
}
