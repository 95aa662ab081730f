//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr through `tracing`; stdout stays reserved for
//! results. `RUST_LOG` wins over `--verbose` when it is set.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Map the CLI verbosity level onto a filter directive.
///
/// 0 silent, 1 errors, 2 warnings, 3-4 info, 5+ trace.
pub fn directive_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "off",
        1 => "error",
        2 => "warn",
        3 | 4 => "info",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose >= 5)
                .with_line_number(verbose >= 5),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_mapping() {
        assert_eq!(directive_for(0), "off");
        assert_eq!(directive_for(1), "error");
        assert_eq!(directive_for(2), "warn");
        assert_eq!(directive_for(3), "info");
        assert_eq!(directive_for(4), "info");
        assert_eq!(directive_for(5), "trace");
        assert_eq!(directive_for(9), "trace");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(1);
        init_logging(5);
    }
}
