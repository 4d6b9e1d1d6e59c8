//! Logging setup for the provider.
//!
//! All logs are written to **stderr**; stdout belongs to the plugin host.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directives (e.g. `info`, `vpsie_provider=debug`)
//! - `TF_LOG`: consulted when `RUST_LOG` is unset, so `TF_LOG=DEBUG` also
//!   turns on provider debug logs. `TF_LOG=JSON` maps to `trace`.
//!
//! # Examples
//!
//! ```bash
//! # Show request-level logs for the REST client
//! RUST_LOG=vpsie_provider::client=debug terraform apply
//!
//! # Let Terraform's own switch drive the level
//! TF_LOG=DEBUG terraform plan
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the default logging subscriber.
///
/// Defaults to `info` if neither `RUST_LOG` nor `TF_LOG` is set.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Initialize logging with a custom default level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
///
/// # Example
///
/// ```ignore
/// use vpsie_provider::init_logging_with_default;
///
/// fn main() {
///     init_logging_with_default("debug");
/// }
/// ```
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(build_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Try to initialize logging, returning false if already initialized.
///
/// Unlike [`init_logging`], this does not panic, which makes it safe to call
/// from every test.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(build_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

fn build_filter(default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = std::env::var("TF_LOG")
        .ok()
        .and_then(|value| tf_log_level(&value))
        .unwrap_or(default_level);
    EnvFilter::new(level)
}

/// Translate a `TF_LOG` value into a tracing level directive.
fn tf_log_level(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "JSON" => Some("trace"),
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" => Some("warn"),
        "ERROR" => Some("error"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be set once per process, so only the
    // filter construction is tested here.

    use super::*;

    #[test]
    fn test_env_filter_parsing() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("vpsie_provider=debug").is_ok());
        assert!(EnvFilter::try_new("warn,vpsie_provider::client=debug").is_ok());
    }

    #[test]
    fn test_tf_log_levels() {
        assert_eq!(tf_log_level("DEBUG"), Some("debug"));
        assert_eq!(tf_log_level("trace"), Some("trace"));
        assert_eq!(tf_log_level("JSON"), Some("trace"));
        assert_eq!(tf_log_level(" warn "), Some("warn"));
        assert_eq!(tf_log_level("off"), None);
        assert_eq!(tf_log_level(""), None);
    }

    #[test]
    fn test_try_init_is_idempotent() {
        let _ = try_init_logging();
        assert!(!try_init_logging());
    }
}
