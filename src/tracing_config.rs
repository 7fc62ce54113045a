//! Log subscriber setup for the `kast` binaries.
//!
//! `KAST_LOG` holds an `EnvFilter` directive string and wins over
//! `RUST_LOG`. `KAST_LOG_FORMAT` picks the output shape:
//!
//! - `text` (default): one line per event
//! - `tree`: spans nested by indentation via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! KAST_LOG="kast_ast::transformer=trace,kast_injekt=debug" KAST_LOG_FORMAT=tree kast check trees/
//! ```
//!
//! Without either filter variable no subscriber is installed and the
//! library crates' events are dropped.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const FILTER_VAR: &str = "KAST_LOG";
pub const FALLBACK_FILTER_VAR: &str = "RUST_LOG";
pub const FORMAT_VAR: &str = "KAST_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Unknown values select `Text`.
    pub fn parse(value: &str) -> LogFormat {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => LogFormat::Tree,
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Where the active filter came from, reported once the subscriber is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    KastLog,
    RustLog,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    pub directives: String,
    pub source: FilterSource,
    pub format: LogFormat,
}

impl TracingSettings {
    /// Resolve settings from raw variable values. Returns `None` when
    /// neither filter variable is present, meaning logging stays off.
    /// An empty `KAST_LOG` still counts as set and yields an empty
    /// filter, which only lets errors through.
    pub fn from_vars(
        kast_log: Option<String>,
        rust_log: Option<String>,
        format: Option<String>,
    ) -> Option<TracingSettings> {
        let (directives, source) = match (kast_log, rust_log) {
            (Some(directives), _) => (directives, FilterSource::KastLog),
            (None, Some(directives)) => (directives, FilterSource::RustLog),
            (None, None) => return None,
        };
        let format = format.as_deref().map(LogFormat::parse).unwrap_or_default();
        Some(TracingSettings {
            directives,
            source,
            format,
        })
    }

    pub fn from_env() -> Option<TracingSettings> {
        TracingSettings::from_vars(
            std::env::var(FILTER_VAR).ok(),
            std::env::var(FALLBACK_FILTER_VAR).ok(),
            std::env::var(FORMAT_VAR).ok(),
        )
    }

    /// Malformed directives are skipped rather than failing startup.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }
}

/// Install the global subscriber if the environment asks for one.
///
/// Output goes to stderr so it never interleaves with dumps on stdout.
/// Returns the settings that were applied.
pub fn init_tracing() -> Option<TracingSettings> {
    let settings = TracingSettings::from_env()?;
    let filter = settings.filter();
    let registry = Registry::default().with(filter);

    match settings.format {
        LogFormat::Tree => registry
            .with(
                tracing_tree::HierarchicalLayer::default()
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    tracing::debug!(
        source = ?settings.source,
        format = ?settings.format,
        directives = %settings.directives,
        "log subscriber installed"
    );
    Some(settings)
}
