//! Logging for embedders of the library.
//!
//! duplitab only emits `tracing` events (duplicity command lines, exit
//! failures, parse summaries); a binary calls [`init`] or [`init_from_config`]
//! once to see them.

use crate::config::LogConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber. `level` applies to duplitab's own events, other
/// crates log at `warn`. `RUST_LOG` takes precedence when set.
pub fn init(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive(level)))
        .unwrap_or_else(|_| EnvFilter::new(directive("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}

pub fn init_from_config(config: &LogConfig) -> anyhow::Result<()> {
    init(&config.level)
}

fn directive(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_scopes_level_to_crate() {
        assert_eq!(directive("debug"), "warn,duplitab=debug");
        assert_eq!(directive(" trace\n"), "warn,duplitab=trace");
        assert!(EnvFilter::try_new(directive("debug")).is_ok());
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init_from_config(&LogConfig::default());
        assert!(init("debug").is_err());
    }
}
