use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use exq_transform::{CallPositionMode, NullGuardOperand};

/// CLI arguments for the exq binary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "exq",
    version,
    about = "Rewrite `x.ex` existential accesses in ESTree JSON"
)]
pub struct CliArgs {
    /// ESTree JSON input; reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// JSON file with rewrite options (camelCase keys).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// How `x.ex()` callees are rewritten.
    #[arg(long = "callPosition", alias = "call-position", value_enum)]
    pub call_position: Option<CallPosition>,

    /// Operand of the `!== null` check.
    #[arg(long = "nullGuard", alias = "null-guard", value_enum)]
    pub null_guard: Option<NullGuard>,

    /// Sentinel property name (default `ex`).
    #[arg(long)]
    pub sentinel: Option<String>,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Report whether anything would be rewritten and exit 1 if so.
    #[arg(long)]
    pub check: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CallPosition {
    #[value(name = "member", alias = "member-branch")]
    Member,
    #[value(name = "call", alias = "call-branch")]
    Call,
}

impl CallPosition {
    pub fn to_mode(self) -> CallPositionMode {
        match self {
            CallPosition::Member => CallPositionMode::MemberBranch,
            CallPosition::Call => CallPositionMode::CallBranch,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum NullGuard {
    #[value(name = "object", alias = "base-object")]
    Object,
    #[value(name = "name", alias = "property-name")]
    Name,
}

impl NullGuard {
    pub fn to_operand(self) -> NullGuardOperand {
        match self {
            NullGuard::Object => NullGuardOperand::BaseObject,
            NullGuard::Name => NullGuardOperand::PropertyName,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// ESTree JSON.
    #[default]
    Json,
    /// JavaScript text.
    #[value(alias = "javascript")]
    Js,
}
