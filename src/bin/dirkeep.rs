//! Empty directory keeper (dirkeep) - Main binary entry point

use dirkeep::cli::args::{Command, ListArgs, MarkerArgs, parse_args};
use dirkeep::cli::output::{format_events_text, format_json, format_marker_text};
use dirkeep::services::marker::{MarkerOptions, run_markers};
use dirkeep::services::platform::{self, FileSystem, PlatformKind};
use dirkeep::services::recorder::EventRecorder;
use dirkeep::{WalkConfig, WalkEvent, WalkSummary, walk_summary};
use serde::Serialize;
use std::path::Path;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug dirkeep create /path
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    let exit_code = match &cli_args.command {
        Command::Marker(marker_args) => handle_marker(marker_args),
        Command::List(list_args) => handle_list(list_args),
    };

    process::exit(exit_code);
}

fn select_platform(label: Option<&str>) -> Result<Arc<dyn FileSystem>, String> {
    match label {
        Some(label) => PlatformKind::from_str(label).map(platform::for_kind),
        None => Ok(platform::for_host()),
    }
}

fn check_root(path: &str) -> Result<(), String> {
    if Path::new(path).exists() {
        Ok(())
    } else {
        Err(format!("Path does not exist: {path}"))
    }
}

fn handle_marker(args: &MarkerArgs) -> i32 {
    let platform = match select_platform(args.platform.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    if let Err(e) = check_root(&args.path) {
        eprintln!("Error: {e}");
        return 2;
    }

    let options = MarkerOptions {
        mode: args.mode,
        marker_name: args.marker.clone(),
        excludes: args.excludes.clone(),
        dry_run: args.dry_run,
    };
    let config = WalkConfig {
        follow_symlinks: args.follow_symlinks,
        ..WalkConfig::default()
    };

    if !args.quiet && !args.json {
        eprintln!("Walking: {} ({} markers '{}')", args.path, args.mode, args.marker);
    }

    let report = match run_markers(&args.path, options, config, platform) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return 4;
        }
    };

    if args.json {
        println!("{}", format_json(&report));
    } else if !args.quiet {
        println!("{}", format_marker_text(&report));
    } else {
        for error in &report.errors {
            eprintln!("Error [{}] {}: {}", error.code, error.path, error.message);
        }
    }

    if let Err(e) = report.ensure_success() {
        log::warn!("{e}");
        return 3;
    }
    if report.completed { 0 } else { 3 }
}

#[derive(Serialize)]
struct ListReport {
    summary: WalkSummary,
    events: Vec<WalkEvent>,
}

fn handle_list(args: &ListArgs) -> i32 {
    let platform = match select_platform(args.platform.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            return 2;
        }
    };

    if let Err(e) = check_root(&args.path) {
        eprintln!("Error: {e}");
        return 2;
    }

    let config = WalkConfig {
        follow_symlinks: args.follow_symlinks,
        visit_files: args.files,
        track_visited_files: args.files,
        track_visited_directories: true,
    };
    let mut recorder = EventRecorder::new();
    let summary = match walk_summary(&args.path, &config, &mut recorder, platform) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return 4;
        }
    };
    let completed = summary.completed;
    let events = recorder.into_events();

    if args.json {
        println!("{}", format_json(&ListReport { summary, events }));
    } else {
        println!("{}", format_events_text(&events));
        eprintln!(
            "{} directories, {} files",
            summary.visited_directories.len(),
            summary.visited_files.len()
        );
    }

    if completed { 0 } else { 3 }
}

fn print_help() {
    println!("Empty directory keeper (dirkeep) - Keep empty directories under version control");
    println!();
    println!("USAGE:");
    println!("    dirkeep create <PATH> [OPTIONS]");
    println!("    dirkeep clean <PATH> [OPTIONS]");
    println!("    dirkeep remove <PATH> [OPTIONS]");
    println!("    dirkeep list <PATH> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    create    Place a marker file in every empty directory");
    println!("    clean     Remove markers from directories that are no longer empty");
    println!("    remove    Remove every marker file");
    println!("    list      Print the depth-first walk order");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("MARKER OPTIONS:");
    println!("    --marker <NAME>           Marker file name (default: .emptydir)");
    println!("    --exclude <NAME>          Skip directories with this name (repeatable;");
    println!("                              .git, .hg, .svn and CVS are always skipped)");
    println!("    --follow-symlinks         Descend into symbolic links to directories");
    println!("    --dry-run                 Report planned changes without touching files");
    println!("    --platform <NAME>         Backend: posix|windows|portable (aliases: unix, win, std)");
    println!("    --json                    Emit machine-readable output");
    println!("    --quiet                   Suppress non-error output");
    println!();
    println!("LIST OPTIONS:");
    println!("    --follow-symlinks         Descend into symbolic links to directories");
    println!("    --no-files                Only walk directories");
    println!("    --platform <NAME>         Backend: posix|windows|portable");
    println!("    --json                    Emit machine-readable output");
    println!();
    println!("EXIT CODES:");
    println!("    0 success, 2 invalid usage, 3 partial failure, 4 fatal error");
    println!();
    println!("EXAMPLES:");
    println!("    dirkeep create ./project --dry-run");
    println!("    dirkeep clean ./project --marker .gitkeep");
    println!("    RUST_LOG=debug dirkeep list ./project --follow-symlinks");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("dirkeep {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
