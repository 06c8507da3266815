//! Logging setup
//!
//! Logs go to stderr so JSON output on stdout stays parseable.
//! `RUST_LOG` wins over the configured level; `--verbose` forces debug.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber (ignored if one is already set)
pub fn init(log_level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { log_level };

    let env_filter = if verbose {
        EnvFilter::new(filter_directives(level))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn filter_directives(level: &str) -> String {
    format!("playtape_core={},playtape={}", level, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives() {
        assert_eq!(
            filter_directives("info"),
            "playtape_core=info,playtape=info"
        );
    }
}
