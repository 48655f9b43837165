//! Logging and observability
//!
//! Tracing subscriber setup for diagnostics, plus the JSONL report of
//! validation runs.

pub mod jsonl;

pub use jsonl::{ReportLogger, ValidationOutcome};

/// Environment variable that overrides the log filter
pub const LOG_ENV: &str = "RELCYCLE_LOG";

/// Install the global tracing subscriber.
///
/// `RELCYCLE_LOG` takes precedence; otherwise `-q` selects `error`, `-v`
/// selects `debug` and the default is `warn`. Output goes to stderr.
pub fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
