//! Tracing configuration.
//!
//! Supports three output formats controlled by `EXQ_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Every match and the context chosen for it
//! EXQ_LOG=debug exq input.json
//!
//! # Skipped accesses too, as a tree
//! EXQ_LOG=exq_transform=trace EXQ_LOG_FORMAT=tree exq input.json
//!
//! # Machine-readable
//! EXQ_LOG=debug EXQ_LOG_FORMAT=json exq input.json
//! ```
//!
//! The subscriber is only initialised when `EXQ_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognised is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("EXQ_LOG_FORMAT").unwrap_or_default())
    }
}

/// `EXQ_LOG` takes precedence over `RUST_LOG` when both are set.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("EXQ_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `EXQ_LOG` nor `RUST_LOG` is set. All output goes
/// to stderr so it never mixes with the rewritten program on stdout.
pub fn init_tracing() {
    let has_exq_log = std::env::var("EXQ_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_exq_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
