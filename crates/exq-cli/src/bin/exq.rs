#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;

use exq_cli::args::CliArgs;
use exq_cli::driver;

const EXIT_SUCCESS: i32 = 0;
/// `--check` found at least one access to rewrite.
const EXIT_WOULD_REWRITE: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if EXQ_LOG or RUST_LOG is set (zero cost otherwise).
    exq_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let output = driver::run(&args)?;

    let code = if args.check && output.changed() {
        eprintln!(
            "{} existential access(es) would be rewritten",
            output.stats.rewritten
        );
        EXIT_WOULD_REWRITE
    } else {
        EXIT_SUCCESS
    };
    std::process::exit(code);
}
