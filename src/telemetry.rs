//! Logging setup (tracing/tracing-subscriber)
//!
//! - `DRILLSMITH_LOG` holds the filter directives (e.g. `debug` or
//!   `warn,drillsmith::qa=debug`). Without it the CLI verbosity flags pick
//!   the level.
//! - `DRILLSMITH_LOG_FORMAT=json` switches to JSON lines.
//!
//! Logs always go to stderr; stdout is reserved for reports.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "DRILLSMITH_LOG";
pub const LOG_FORMAT_ENV: &str = "DRILLSMITH_LOG_FORMAT";

/// Default filter for the given verbosity flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    }
}

pub fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose);

    // try_init: a second initialization (tests) is not an error
    match std::env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => {
            let _ = builder.json().try_init();
        }
        _ => {
            let _ = builder.try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(default_directive(false, false), "warn");
        assert_eq!(default_directive(true, false), "debug");
        assert_eq!(default_directive(true, true), "error");
    }
}
