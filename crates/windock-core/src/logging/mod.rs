use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Crates whose events are shown by default.
const LOG_TARGETS: [&str; 2] = ["windock_core", "windock"];

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted. Otherwise the
/// level comes from `WINDOCK_LOG_LEVEL` (default `info`). `RUST_LOG` still
/// applies to other targets.
pub fn init_logging(quiet: bool) {
    let level = if quiet {
        LevelFilter::ERROR
    } else {
        parse_level(&Config::new().log_level)
    };

    let filter = target_directives(level)
        .into_iter()
        .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}

/// Parse a level name, falling back to `info` for anything unrecognized.
fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or_else(|_| {
        eprintln!("Warning: Unknown log level '{}'. Using info.", level);
        LevelFilter::INFO
    })
}

fn target_directives(level: LevelFilter) -> Vec<Directive> {
    LOG_TARGETS
        .iter()
        .filter_map(|target| format!("{}={}", target, level).parse().ok())
        .collect()
}
