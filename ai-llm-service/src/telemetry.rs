use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, filter, fmt};

/// Target prefixes of the crates that make up the advisory service.
pub const TARGET_PREFIXES: &[&str] = &["ai_llm_service", "rag_advisor", "api", "agri_advisor"];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Build a formatting layer that renders ONLY events emitted by the service crates.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with `file:line` and target
/// - Span close events (duration of instrumented functions)
/// - ANSI colors only when stdout is a terminal
///
/// Events from dependencies (hyper, reqwest, ...) are dropped by a per-layer filter,
/// so this layer can be composed with any global `EnvFilter`.
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    let only_service_crates = filter::filter_fn(|meta| is_service_target(meta.target()));

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
        .with_filter(only_service_crates)
}

fn is_service_target(target: &str) -> bool {
    TARGET_PREFIXES.iter().any(|p| {
        target == *p
            || target
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

/// Level directive for one service crate, e.g. `ai_llm_service=debug`.
pub fn level_directive(target: &str, level: Level) -> Result<Directive, ParseError> {
    format!("{target}={}", level.as_str().to_lowercase()).parse()
}

/// Create an `EnvFilter` from `RUST_LOG`; when it is unset, use `default` and
/// set every service crate to `level`.
///
/// Example: `default = "warn"`, `level = Level::INFO` keeps dependencies at WARN
/// and shows INFO for the service crates.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut filter = EnvFilter::new(default);
    for target in TARGET_PREFIXES {
        if let Ok(d) = level_directive(target, level) {
            filter = filter.add_directive(d);
        }
    }
    filter
}
