use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "constmap")]
#[command(author, version, about = "Map magic numeric literals to named constants")]
#[command(long_about = "Scans a decompiled C# source tree for numeric literals that are really \
    symbolic constants and rewrites them to qualified references.\n\n\
    The analyze phase writes a reviewable report.json; the patch phase replays \
    it against a copy of the tree. The report may be hand-edited in between.\n\n\
    Exit codes:\n  \
    0 - Run completed\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the source tree and build a report
    Analyze(AnalyzeArgs),

    /// Patch the source tree from a previously built report
    Patch(PatchArgs),

    /// Analyze then patch in one run
    Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Source tree to analyze
    pub source: PathBuf,

    /// Path to the mappings configuration file
    #[arg(short, long, default_value = "mappings.json")]
    pub mappings: PathBuf,

    /// Destination directory for the report (defaults to the source's parent)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Omit failed replacements from the report instead of recording them
    #[arg(short, long)]
    pub ignore_failed: bool,
}

#[derive(Parser, Debug)]
pub struct PatchArgs {
    /// Source tree to patch (read-only; a patched copy is created)
    pub source: PathBuf,

    /// Directory holding report.json and receiving the patched tree
    /// (defaults to the source's parent)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Source tree to analyze and patch
    pub source: PathBuf,

    /// Path to the mappings configuration file
    #[arg(short, long, default_value = "mappings.json")]
    pub mappings: PathBuf,

    /// Destination directory for the report and the patched tree
    /// (defaults to the source's parent)
    #[arg(short, long)]
    pub destination: Option<PathBuf>,

    /// Omit failed replacements from the report instead of recording them
    #[arg(short, long)]
    pub ignore_failed: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
