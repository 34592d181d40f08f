//! CLI argument parsing

use crate::services::marker::{
    DEFAULT_EXCLUDES, DEFAULT_MARKER_NAME, MarkerMode, validate_marker_name,
};

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Marker(MarkerArgs),
    List(ListArgs),
}

#[derive(Debug, Clone)]
pub struct MarkerArgs {
    pub mode: MarkerMode,
    pub path: String,
    pub marker: String,
    pub excludes: Vec<String>,
    pub follow_symlinks: bool,
    pub dry_run: bool,
    pub json: bool,
    pub quiet: bool,
    pub platform: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListArgs {
    pub path: String,
    pub follow_symlinks: bool,
    pub files: bool,
    pub json: bool,
    pub platform: Option<String>,
}

impl MarkerArgs {
    fn with_mode(mode: MarkerMode) -> Self {
        Self {
            mode,
            path: String::new(),
            marker: DEFAULT_MARKER_NAME.to_string(),
            excludes: DEFAULT_EXCLUDES.iter().map(ToString::to_string).collect(),
            follow_symlinks: false,
            dry_run: false,
            json: false,
            quiet: false,
            platform: None,
        }
    }
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            path: String::new(),
            follow_symlinks: false,
            files: true,
            json: false,
            platform: None,
        }
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "create" => Command::Marker(parse_marker_args(MarkerMode::Create, &args[2..])?),
        "clean" => Command::Marker(parse_marker_args(MarkerMode::Clean, &args[2..])?),
        "remove" => Command::Marker(parse_marker_args(MarkerMode::Remove, &args[2..])?),
        "list" => Command::List(parse_list_args(&args[2..])?),
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

fn parse_marker_args(mode: MarkerMode, args: &[String]) -> Result<MarkerArgs, String> {
    let mut marker_args = MarkerArgs::with_mode(mode);
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--marker" => {
                i += 1;
                if i >= args.len() {
                    return Err("--marker requires a file name".to_string());
                }
                validate_marker_name(&args[i]).map_err(|e| e.to_string())?;
                marker_args.marker.clone_from(&args[i]);
            }
            "--exclude" => {
                i += 1;
                if i >= args.len() {
                    return Err("--exclude requires a directory name".to_string());
                }
                marker_args.excludes.push(args[i].clone());
            }
            "--platform" => {
                i += 1;
                if i >= args.len() {
                    return Err("--platform requires a value".to_string());
                }
                marker_args.platform = Some(args[i].clone());
            }
            "--follow-symlinks" => marker_args.follow_symlinks = true,
            "--dry-run" => marker_args.dry_run = true,
            "--json" => marker_args.json = true,
            "--quiet" => marker_args.quiet = true,
            arg if !arg.starts_with("--") => {
                if marker_args.path.is_empty() {
                    marker_args.path = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if marker_args.path.is_empty() {
        return Err("Missing required argument: PATH".to_string());
    }

    Ok(marker_args)
}

fn parse_list_args(args: &[String]) -> Result<ListArgs, String> {
    let mut list_args = ListArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--platform" => {
                i += 1;
                if i >= args.len() {
                    return Err("--platform requires a value".to_string());
                }
                list_args.platform = Some(args[i].clone());
            }
            "--follow-symlinks" => list_args.follow_symlinks = true,
            "--no-files" => list_args.files = false,
            "--json" => list_args.json = true,
            arg if !arg.starts_with("--") => {
                if list_args.path.is_empty() {
                    list_args.path = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if list_args.path.is_empty() {
        return Err("Missing required argument: PATH".to_string());
    }

    Ok(list_args)
}
