use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the kast binary.
#[derive(Parser, Debug)]
#[command(name = "kast", version, about = "Inspect serialized kast syntax trees")]
pub struct CliArgs {
    /// Path to a kast.json file. Defaults to ./kast.json when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a tree as indented text.
    Dump(DumpArgs),
    /// Count nodes per kind and per category.
    Stats(StatsArgs),
    /// Report structural problems; exits with status 1 on errors.
    Check(CheckArgs),
    /// Duplicate a subtree and write the resulting arena.
    Copy(CopyArgs),
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Serialized arena to read.
    pub file: PathBuf,

    /// Node to start from. Defaults to the only unowned node.
    #[arg(long)]
    pub root: Option<u32>,

    /// Levels below the root to print.
    #[arg(long)]
    pub depth: Option<u32>,

    /// Spaces per indentation step.
    #[arg(long)]
    pub indent: Option<usize>,

    /// Omit node attributes.
    #[arg(long = "no-attributes")]
    pub no_attributes: bool,

    /// Omit reported types.
    #[arg(long = "no-types")]
    pub no_types: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Arena files, or directories searched for *.json files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Arena files, or directories searched for *.json files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Treat warnings as errors for the exit status.
    #[arg(long = "warnings-as-errors")]
    pub warnings_as_errors: bool,
}

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Serialized arena to read.
    pub file: PathBuf,

    /// Root of the subtree to copy.
    #[arg(long)]
    pub root: u32,

    /// Where to write the arena holding the copy.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}
