//! Telemetry initialization.
//!
//! Controlled by `SDLC_LOG`:
//! - unset or empty → no-op (tracing disabled)
//! - `"json"` or `"stderr"` → JSON spans/events to stderr
//! - `"pretty"` → human-readable events to stderr
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Environment variable selecting the log sink.
pub const LOG_ENV: &str = "SDLC_LOG";

/// Where log output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogMode {
    Off,
    Json,
    Pretty,
}

impl LogMode {
    /// Interpret an `SDLC_LOG` value. Unrecognized values fall back to JSON.
    #[must_use]
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Off,
            Some(v) if v.eq_ignore_ascii_case("pretty") => Self::Pretty,
            Some(_) => Self::Json,
        }
    }
}

/// Install the global subscriber selected by `SDLC_LOG`.
///
/// Returns the mode that was installed. Safe to call more than once; later
/// calls leave the first subscriber in place.
pub fn init() -> LogMode {
    let mode = LogMode::from_env_value(std::env::var(LOG_ENV).ok().as_deref());
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match mode {
        LogMode::Off => return mode,
        LogMode::Json => tracing_subscriber::registry()
            .with(filter())
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE),
            )
            .try_init(),
        LogMode::Pretty => tracing_subscriber::registry()
            .with(filter())
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = installed {
        eprintln!("warning: telemetry already initialized: {e}");
    }
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_empty_is_off() {
        assert_eq!(LogMode::from_env_value(None), LogMode::Off);
        assert_eq!(LogMode::from_env_value(Some("")), LogMode::Off);
        assert_eq!(LogMode::from_env_value(Some("  ")), LogMode::Off);
    }

    #[test]
    fn json_aliases() {
        assert_eq!(LogMode::from_env_value(Some("json")), LogMode::Json);
        assert_eq!(LogMode::from_env_value(Some("stderr")), LogMode::Json);
    }

    #[test]
    fn pretty_is_case_insensitive() {
        assert_eq!(LogMode::from_env_value(Some("Pretty")), LogMode::Pretty);
    }
}
