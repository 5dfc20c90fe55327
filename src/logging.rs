//! Diagnostics go to stderr through `tracing`; stdout and the output files
//! only ever carry generated documents.

use std::env;
use std::io::IsTerminal;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

const LOG_FILTER: &str = "RUST_LOG";

#[derive(Debug, Default, Clone, Copy)]
pub struct LogOptions {
    /// Number of `--verbose` flags given.
    pub verbosity: u8,
    pub silent: bool,
}

impl LogOptions {
    /// An explicit flag overrides whatever `RUST_LOG` says.
    fn level_filter(&self) -> Option<LevelFilter> {
        match (self.silent, self.verbosity) {
            (true, _) => Some(LevelFilter::OFF),
            (false, 0) => None,
            (false, 1) => Some(LevelFilter::DEBUG),
            (false, _) => Some(LevelFilter::TRACE),
        }
    }
}

/// Install the global subscriber. Call once, before any parsing.
pub fn init(options: LogOptions) {
    let env_filter = match env::var_os(LOG_FILTER) {
        Some(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        None => EnvFilter::new("info"),
    };

    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_file(false)
        .with_line_number(false)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    match options.level_filter() {
        Some(level) => builder.with_max_level(level).init(),
        None => builder.init(),
    }
}
