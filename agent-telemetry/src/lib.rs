//! Observability utilities for agent tool applications.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing helpers.

    use anyhow::{Result, anyhow};
    use tracing_subscriber::EnvFilter;

    /// Installs a global `fmt` subscriber.
    ///
    /// The filter comes from `RUST_LOG` when set, `default_filter` otherwise
    /// (e.g. `"info"` or `"agent_tools=debug,info"`).
    ///
    /// # Errors
    ///
    /// Returns an error when `default_filter` is not a valid directive or a
    /// global subscriber is already installed.
    pub fn init_tracing(default_filter: &str) -> Result<()> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(default_filter)
                .map_err(|err| anyhow!("invalid log filter `{default_filter}`: {err}"))?,
        };

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .try_init()
            .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
    }
}

pub use tracing_support::init_tracing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter_or_double_init() {
        // Either the filter is rejected, or RUST_LOG took over and the first
        // install succeeds while the second one fails.
        if init_tracing("=[not a filter").is_ok() {
            assert!(init_tracing("info").is_err());
        }
    }
}
