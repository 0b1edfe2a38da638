use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use constmap::analyzer::Analyzer;
use constmap::cli::{AnalyzeArgs, Cli, Commands, PatchArgs, RunArgs};
use constmap::mappings::Mappings;
use constmap::patcher::Patcher;
use constmap::progress::FileProgress;
use constmap::report::Report;
use constmap::scanner;
use constmap::{ConstMapError, EXIT_CONFIG_ERROR, EXIT_SUCCESS};

fn main() {
    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(args, &cli),
        Commands::Patch(args) => run_patch(args, &cli),
        Commands::Run(args) => run_run(args, &cli),
    };

    std::process::exit(exit_code);
}

fn run_analyze(args: &AnalyzeArgs, cli: &Cli) -> i32 {
    match run_analyze_impl(
        &args.source,
        &args.mappings,
        args.destination.as_deref(),
        args.ignore_failed,
        cli.quiet,
    ) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

fn run_analyze_impl(
    source: &Path,
    mappings_path: &Path,
    destination: Option<&Path>,
    ignore_failed: bool,
    quiet: bool,
) -> constmap::Result<()> {
    let source = validate_source(source)?;
    let destination = resolve_destination(&source, destination)?;

    // 1. Load and validate the rule set; all configuration errors surface
    //    here, before any tree I/O.
    let mut mappings = Mappings::load(mappings_path)?;
    if !quiet {
        println!(
            "Loaded {} rules, {} ignored",
            mappings.rules.len() + mappings.ignored,
            mappings.ignored
        );
    }

    // 2. One-time strategy setup; fully precedes the scan.
    mappings.initialize(&source)?;

    // 3. Enumerate and scan.
    let files = scanner::source_files(&source)?;
    if !quiet {
        println!("{} files found", files.len());
    }
    #[allow(clippy::cast_possible_truncation)]
    let progress = FileProgress::new(files.len() as u64, quiet);
    let analyzer = Analyzer::new(mappings, ignore_failed);
    let report = analyzer.analyze_files(&source, &files, &progress)?;

    // 4. Persist the artifact.
    fs::create_dir_all(&destination)?;
    report.save(&destination)?;
    if !quiet {
        println!("Analyzing done");
        println!("{} matches found, {} failed", report.total, report.failed);
    }
    Ok(())
}

fn run_patch(args: &PatchArgs, cli: &Cli) -> i32 {
    match run_patch_impl(&args.source, args.destination.as_deref(), cli.quiet) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

fn run_patch_impl(source: &Path, destination: Option<&Path>, quiet: bool) -> constmap::Result<()> {
    let source = validate_source(source)?;
    let destination = resolve_destination(&source, destination)?;
    let destination_project = patched_tree_path(&source, &destination)?;

    let report = Report::load(&destination)?;
    if !quiet {
        println!(
            "Patching from '{}' to '{}'",
            source.display(),
            destination_project.display()
        );
        println!(
            "{}/{} modifications found",
            report.resolved(),
            report.total
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    let progress = FileProgress::new(report.files.len() as u64, quiet);
    let patcher = Patcher::new(report);
    let summary = patcher.patch(&source, &destination_project, &progress)?;

    if !quiet {
        println!("Patching done");
        println!("{} classes created", summary.classes_created);
    }
    Ok(())
}

fn run_run(args: &RunArgs, cli: &Cli) -> i32 {
    let result = run_analyze_impl(
        &args.source,
        &args.mappings,
        args.destination.as_deref(),
        args.ignore_failed,
        cli.quiet,
    )
    .and_then(|()| run_patch_impl(&args.source, args.destination.as_deref(), cli.quiet));

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

fn validate_source(source: &Path) -> constmap::Result<PathBuf> {
    if !source.is_dir() {
        return Err(ConstMapError::Config(format!(
            "Directory {} doesn't exist",
            source.display()
        )));
    }
    Ok(source.to_path_buf())
}

fn resolve_destination(source: &Path, destination: Option<&Path>) -> constmap::Result<PathBuf> {
    if let Some(dest) = destination {
        return Ok(dest.to_path_buf());
    }
    source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            ConstMapError::Config("Unable to determine the source's parent directory".to_string())
        })
}

fn patched_tree_path(source: &Path, destination: &Path) -> constmap::Result<PathBuf> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ConstMapError::Config("Source path has no directory name".to_string()))?;
    Ok(destination.join(format!("{name}_patched")))
}
