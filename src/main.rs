//! CLI entry point for dirsize

use std::io::{self, BufRead, IsTerminal};
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use dirsize::{
    OutputConfig, QueryFailurePolicy, SizeError, SizeWalker, TracingSink, WalkerConfig,
    print_json, print_table, resolve_paths,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dirsize")]
#[command(about = "Total file count and size of directories, without crossing symlinks or mount points")]
#[command(version)]
struct Args {
    /// Directories to size; wildcards are expanded. `-` reads paths from stdin.
    /// Defaults to the current directory.
    #[arg(value_name = "PATH")]
    paths: Vec<String>,

    /// Directories to size, taken exactly as typed (no wildcard expansion)
    #[arg(
        short = 'L',
        long = "literal-path",
        value_name = "PATH",
        visible_alias = "lp",
        alias = "pspath",
        conflicts_with = "paths"
    )]
    literal_paths: Vec<String>,

    /// Include files in all subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Output in JSON format
    #[arg(long = "json")]
    json: bool,

    /// Show byte counts only, without the human-readable size column
    #[arg(short = 'b', long = "bytes")]
    bytes: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Number of directories sized in parallel
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// What to do with a subdirectory whose reparse data cannot be read
    #[arg(long = "on-query-failure", value_name = "POLICY", default_value = "skip")]
    on_query_failure: QueryFailurePolicy,

    /// Show skipped paths (-v) and per-directory totals (-vv) on stderr
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn setup_logging(verbose: u8) {
    let default = match verbose {
        0 => "dirsize=info",
        1 => "dirsize=debug",
        _ => "dirsize=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Replace every `-` with the non-empty lines read from stdin.
fn expand_stdin(values: Vec<String>) -> io::Result<Vec<String>> {
    if !values.iter().any(|v| v == "-") {
        return Ok(values);
    }

    let mut from_stdin = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            from_stdin.push(line.to_string());
        }
    }

    let mut expanded = Vec::with_capacity(values.len() + from_stdin.len());
    for value in values {
        if value == "-" {
            expanded.extend(from_stdin.iter().cloned());
        } else {
            expanded.push(value);
        }
    }
    Ok(expanded)
}

fn report_error(err: &SizeError) {
    eprintln!("dirsize: {}", err);
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|e| {
        eprintln!("dirsize: cannot determine current directory: {}", e);
        process::exit(1);
    });

    let literal = !args.literal_paths.is_empty();
    let inputs = if literal {
        args.literal_paths.clone()
    } else {
        args.paths.clone()
    };
    let inputs = expand_stdin(inputs).unwrap_or_else(|e| {
        eprintln!("dirsize: error reading paths from stdin: {}", e);
        process::exit(1);
    });

    let resolution = resolve_paths(&inputs, literal, &cwd);
    let mut had_errors = !resolution.errors.is_empty();
    for err in &resolution.errors {
        report_error(err);
    }

    let walker = SizeWalker::new(WalkerConfig {
        recurse: args.recurse,
        on_query_failure: args.on_query_failure,
        parallel_workers: args.jobs,
    });

    let mut results = Vec::new();
    for outcome in walker.compute_sizes(&resolution.paths, TracingSink::new) {
        match outcome.result {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {}
            Err(e) => {
                report_error(&e);
                had_errors = true;
            }
        }
    }

    let written = if args.json {
        print_json(&results)
    } else {
        print_table(
            &results,
            OutputConfig {
                use_color: should_use_color(args.color),
                human_sizes: !args.bytes,
            },
        )
    };

    if let Err(e) = written {
        eprintln!("dirsize: error writing output: {}", e);
        process::exit(1);
    }

    if had_errors {
        process::exit(1);
    }
}
