#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;

use clap::{CommandFactory, Parser, Subcommand};
use flightdeck_core::ErrorCode;
use flightdeck_core::config::{EffectiveConfig, resolve_config, resolve_login};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "flightdeck: ticket dashboard and analytics engine",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Output format; defaults to FORMAT, the user config, then TTY detection.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Login whose tickets make up "mine" (overrides FLIGHTDECK_USER).
    #[arg(long, global = true, value_name = "LOGIN")]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self, config: &EffectiveConfig) -> OutputMode {
        resolve_output_mode(self.format, self.json, &config.resolved_output)
    }

    /// Flag-only output mode, for errors raised before config resolves.
    fn early_output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json, "text")
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Dashboard",
        about = "Show the dashboard's named ticket lists",
        long_about = "Classify a snapshot and print every named collection of the dashboard.",
        after_help = "EXAMPLES:\n    # Overview lists\n    flightdeck board --snapshot tickets.json\n\n    # Include kanban columns\n    flightdeck board --snapshot tickets.json --mode board\n\n    # Emit machine-readable output\n    flightdeck board --snapshot tickets.json --json"
    )]
    Board(cmd::board::BoardArgs),

    #[command(
        next_help_heading = "Dashboard",
        about = "Show count tables",
        long_about = "Count tickets by status, priority, severity, workflow state and theme.",
        after_help = "EXAMPLES:\n    # Count tables\n    flightdeck stats --snapshot tickets.json\n\n    # Emit machine-readable output\n    flightdeck stats --snapshot tickets.json --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Dashboard",
        about = "Show active workload per member",
        long_about = "Group active tickets by assignee, optionally rolled up into configured teams.",
        after_help = "EXAMPLES:\n    # Per member\n    flightdeck members --snapshot tickets.json\n\n    # Per team\n    flightdeck members --snapshot tickets.json --teams"
    )]
    Members(cmd::members::MembersArgs),

    #[command(
        next_help_heading = "Analytics",
        about = "Project tickets onto the analytics scatter plot",
        long_about = "Filter tickets, compute metric bounds and lay out plot points.",
        after_help = "EXAMPLES:\n    # Default axes from config\n    flightdeck plot --snapshot tickets.json\n\n    # Risk against complexity, dependencies included\n    flightdeck plot --snapshot tickets.json --x risk --y complexity --deps\n\n    # Only alice's tickets worth at least 1000\n    flightdeck plot --snapshot tickets.json --filter assignee=alice --filter revenue=1000"
    )]
    Plot(cmd::plot::PlotArgs),

    #[command(
        next_help_heading = "Analytics",
        about = "Show metric bounds",
        long_about = "Compute min, max, average and distinct values of every numeric metric.",
        after_help = "EXAMPLES:\n    # Exact ranges\n    flightdeck bounds --snapshot tickets.json\n\n    # Widened by 10%\n    flightdeck bounds --snapshot tickets.json --padding 1.1"
    )]
    Bounds(cmd::bounds::BoundsArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    flightdeck completions bash\n\n    # Generate zsh completions\n    flightdeck completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FLIGHTDECK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "flightdeck=debug,info"
        } else {
            "flightdeck=info,warn"
        })
    });

    let format = env::var("FLIGHTDECK_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args, &mut command);
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(err) => {
            let code = ErrorCode::ConfigParseError;
            render_error(
                cli.early_output_mode(),
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or(code.message()),
                    code.code(),
                ),
            )?;
            return Err(err);
        }
    };

    let ctx = cmd::Context {
        output: cli.output_mode(&config),
        login: resolve_login(cli.user.as_deref(), &config.user),
        project: config.project,
    };
    debug!(output = ?ctx.output, login = ?ctx.login, "resolved context");

    match &cli.command {
        Commands::Board(args) => cmd::board::run_board(args, &ctx),
        Commands::Stats(args) => cmd::stats::run_stats(args, &ctx),
        Commands::Members(args) => cmd::members::run_members(args, &ctx),
        Commands::Plot(args) => cmd::plot::run_plot(args, &ctx),
        Commands::Bounds(args) => cmd::bounds::run_bounds(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}
