use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use depwalker_core::AlternativeMode;
use depwalker_resolver::PackageUniverse;
use tracing_subscriber::EnvFilter;

mod completion;
mod config;
mod render;
mod report;

use completion::{resolve_completion_shell, write_completions_script, CliCompletionShell};
use config::{load_file_config, CliOverrides, OutputStyle, ReportFormat, Settings};
use render::TerminalRenderer;
use report::{
    build_package_view, build_stub_views, format_package_view_lines, format_stats_lines,
    format_stub_lines, render_json, render_stats_json,
};

#[derive(Parser, Debug)]
#[command(name = "depwalker")]
#[command(
    about = "Dependency graph statistics for Debian-style Packages files",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Config file, defaults to depwalker.toml in the working directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Count every `a | b` alternative as its own dependency
    #[arg(long, global = true, conflicts_with = "grouped_alternatives")]
    expand_alternatives: bool,
    /// Keep `a | b` alternatives as one dependency, overriding the config file
    #[arg(long, global = true)]
    grouped_alternatives: bool,
    /// Disable colors and progress bars
    #[arg(long, global = true)]
    plain: bool,
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Packages file, used when no subcommand is given
    packages: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse, resolve and print graph statistics
    Stats { packages: Option<PathBuf> },
    /// Print the resolved dependencies of one package or stub
    Show {
        name: String,
        packages: Option<PathBuf>,
    },
    /// List every stub package with the packages that depend on it
    Stubs { packages: Option<PathBuf> },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Option<CliCompletionShell>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Stats,
    Show(String),
    Stubs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    run_cli(cli)
}

fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn split_command(cli: &Cli) -> (Action, Option<PathBuf>) {
    match &cli.command {
        None => (Action::Stats, cli.packages.clone()),
        Some(Commands::Stats { packages }) => (Action::Stats, packages.clone()),
        Some(Commands::Show { name, packages }) => (Action::Show(name.clone()), packages.clone()),
        Some(Commands::Stubs { packages }) => (Action::Stubs, packages.clone()),
        Some(Commands::Completions { .. }) => (Action::Stats, None),
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let shell_env = process_env("SHELL");
        let shell = resolve_completion_shell(*shell, shell_env.as_deref(), cfg!(windows));
        return write_completions_script(shell, &mut io::stdout().lock());
    }

    let (action, packages_file) = split_command(&cli);
    let file_config = load_file_config(cli.config.as_deref(), process_env)?;
    let overrides = CliOverrides {
        expand_alternatives: cli.expand_alternatives,
        grouped_alternatives: cli.grouped_alternatives,
        plain: cli.plain,
        packages_file,
    };
    let settings = Settings::resolve(
        &overrides,
        &file_config,
        process_env,
        io::stdout().is_terminal(),
    );
    let path = settings.require_packages_file()?;

    let json = cli.format == ReportFormat::Json;
    let renderer = TerminalRenderer::new(if json {
        OutputStyle::Plain
    } else {
        settings.style
    });
    let universe = build_universe(path, settings.mode, renderer, !json)?;

    match action {
        Action::Stats => {
            let stats = universe.stats();
            if json {
                println!("{}", render_stats_json(&stats)?);
            } else {
                renderer.print_lines(&format_stats_lines(&stats));
            }
        }
        Action::Show(name) => {
            let view = build_package_view(&universe, &name)?;
            if json {
                println!("{}", render_json(&view)?);
            } else {
                renderer.print_lines(&format_package_view_lines(&view));
            }
        }
        Action::Stubs => {
            let views = build_stub_views(&universe);
            if json {
                println!("{}", render_json(&views)?);
            } else {
                renderer.print_lines(&format_stub_lines(&views));
            }
        }
    }

    Ok(())
}

fn build_universe(
    path: &Path,
    mode: AlternativeMode,
    renderer: TerminalRenderer,
    announce: bool,
) -> Result<PackageUniverse> {
    let file = File::open(path)
        .with_context(|| format!("failed to open Packages file: {}", path.display()))?;
    if announce {
        renderer.print_status(&format!("Parsing Packages file `{}`...", path.display()));
    }

    let mut universe = PackageUniverse::new();
    let mut progress = renderer.start_spinner("parse");
    let ingested = universe
        .ingest_reader(BufReader::new(file), mode, |_| progress.inc())
        .with_context(|| format!("failed to parse Packages file: {}", path.display()));
    let count = match ingested {
        Ok(count) => count,
        Err(err) => {
            progress.finish_abandon();
            return Err(err);
        }
    };
    progress.finish_success();

    if announce {
        renderer.print_status("Building the dependency tree...");
    }
    let mut progress = renderer.start_progress("resolve", count as u64);
    universe.resolve_all_with(|done, _| progress.set(done as u64));
    progress.finish_success();
    if announce {
        renderer.print_status("Done building dependency tree.");
    }

    Ok(universe)
}
