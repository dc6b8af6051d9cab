//! Read, rewrite and render one ESTree document.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::args::{CliArgs, OutputFormat};
use exq_ast::{Estree, NodeArena, Printer};
use exq_transform::{ExistentialOptions, RewriteStats, run_existential_pass};

/// Result of rewriting one document.
#[derive(Debug, Clone)]
pub struct RewriteOutput {
    /// Rendered output (ends with a newline).
    pub text: String,
    pub substitutions: usize,
    pub stats: RewriteStats,
}

impl RewriteOutput {
    pub fn changed(&self) -> bool {
        self.substitutions > 0
    }
}

/// Load options from `--config`, then apply flag overrides.
pub fn resolve_options(args: &CliArgs) -> Result<ExistentialOptions> {
    let mut options = match args.config.as_deref() {
        Some(path) => load_config(path)?,
        None => ExistentialOptions::default(),
    };

    if let Some(mode) = args.call_position {
        options.call_position = mode.to_mode();
    }
    if let Some(operand) = args.null_guard {
        options.null_guard = operand.to_operand();
    }
    if let Some(sentinel) = &args.sentinel {
        options.sentinel = sentinel.clone();
    }
    if options.sentinel.is_empty() {
        anyhow::bail!("sentinel property name must not be empty");
    }

    debug!(?options, "resolved options");
    Ok(options)
}

pub fn load_config(path: &Path) -> Result<ExistentialOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

/// Read the input document from a file, or stdin for `None` / `-`.
pub fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Rewrite an ESTree JSON document and render it in `format`.
pub fn rewrite_document(
    source: &str,
    options: &ExistentialOptions,
    format: OutputFormat,
) -> Result<RewriteOutput> {
    let tree: Estree = serde_json::from_str(source).context("input is not valid ESTree JSON")?;

    // ESTree JSON runs at roughly one node per 32 bytes
    let mut arena = NodeArena::with_capacity(source.len() / 32);
    let root = tree
        .lower(&mut arena)
        .context("failed to import ESTree document")?;
    let outcome = run_existential_pass(&mut arena, root, options)
        .context("existential access rewrite failed")?;
    let root = outcome.report.root;

    let mut text = match format {
        OutputFormat::Json => {
            let raised = Estree::raise(&arena, root).context("failed to export rewritten tree")?;
            serde_json::to_string_pretty(&raised)?
        }
        OutputFormat::Js => Printer::print_to_string(&arena, root),
    };
    text.push('\n');

    info!(
        matched = outcome.stats.matched,
        rewritten = outcome.stats.rewritten,
        "document rewritten"
    );
    Ok(RewriteOutput {
        text,
        substitutions: outcome.report.substitutions,
        stats: outcome.stats,
    })
}

/// Run the whole command. Returns the rewrite output so the caller can
/// decide the exit status.
pub fn run(args: &CliArgs) -> Result<RewriteOutput> {
    let options = resolve_options(args)?;
    let source = read_input(args.input.as_deref())?;
    let output = rewrite_document(&source, &options, args.format)?;

    if args.check {
        return Ok(output);
    }
    match args.output.as_deref() {
        Some(path) => std::fs::write(path, &output.text)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.text.as_bytes())
                .context("failed to write stdout")?;
        }
    }
    Ok(output)
}
