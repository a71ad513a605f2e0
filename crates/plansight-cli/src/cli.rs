//! Plansight command line interface
//!
//! Turns EXPLAIN JSON into a positioned plan graph (`render`) or a table of
//! nodes with their cost classification (`summary`).

mod logging;
mod output;
mod settings;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use plansight_explain::{Dialect, PlanLayoutOptions, VisualPlan, visualize_str};
use plansight_layout::Direction;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::logging::LoggingConfig;
use crate::settings::Settings;

/// Visualize database execution plans
#[derive(Parser, Debug)]
#[command(name = "plansight")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file (defaults to <config dir>/plansight/settings.json)
    #[arg(long, env = "PLANSIGHT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log to stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write JSON logs to a daily rolling file in this directory
    #[arg(long, env = "PLANSIGHT_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the laid-out plan graph as JSON
    Render {
        #[command(flatten)]
        input: PlanInput,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Print a table of plan nodes with severity and flags
    Summary {
        #[command(flatten)]
        input: PlanInput,
    },
}

#[derive(Args, Debug)]
struct PlanInput {
    /// EXPLAIN (FORMAT JSON) output, or `-` for stdin
    file: PathBuf,

    /// Source dialect: postgresql or mysql
    #[arg(short, long, env = "PLANSIGHT_DIALECT")]
    dialect: Option<String>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// Flow direction: TB, BT, LR or RL
    #[arg(long, value_parser = parse_direction)]
    direction: Option<Direction>,

    /// Card width in pixels
    #[arg(long)]
    node_width: Option<f64>,

    /// Card height in pixels
    #[arg(long)]
    node_height: Option<f64>,
}

impl LayoutArgs {
    fn apply(&self, mut options: PlanLayoutOptions) -> PlanLayoutOptions {
        if let Some(direction) = self.direction {
            options.layout.direction = direction;
        }
        if let Some(width) = self.node_width {
            options.node_width = width;
        }
        if let Some(height) = self.node_height {
            options.node_height = height;
        }
        options
    }
}

fn parse_direction(s: &str) -> std::result::Result<Direction, String> {
    Direction::parse(s).ok_or_else(|| format!("unknown direction '{s}', expected TB, BT, LR or RL"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        json: cli.log_json,
        log_dir: cli.log_dir.clone(),
        ..LoggingConfig::default()
    }
    .with_verbosity(cli.verbose);
    if let Err(e) = logging::init(logging) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            input,
            layout,
            compact,
        } => {
            let options = layout.apply(settings.layout.clone());
            let plan = load_plan(&input, &settings, &options)?;
            println!("{}", output::render_json(&plan, compact)?);
        }
        Command::Summary { input } => {
            let plan = load_plan(&input, &settings, &settings.layout)?;
            println!("{}", output::render_summary(&plan));
        }
    }
    Ok(())
}

fn load_plan(input: &PlanInput, settings: &Settings, options: &PlanLayoutOptions) -> Result<VisualPlan> {
    let dialect = resolve_dialect(input.dialect.as_deref(), settings)?;
    let text = read_input(&input.file)?;

    let plan = visualize_str(&text, dialect.as_str(), options)
        .with_context(|| format!("Failed to read plan from {}", input.file.display()))?;
    if plan.is_empty() {
        bail!(output::EMPTY_PLAN);
    }
    tracing::info!(
        dialect = dialect.as_str(),
        nodes = plan.nodes.len(),
        width = plan.width,
        height = plan.height,
        "plan visualized"
    );
    Ok(plan)
}

fn resolve_dialect(flag: Option<&str>, settings: &Settings) -> Result<Dialect> {
    let name = flag
        .or(settings.default_dialect.as_deref())
        .context("No dialect given; pass --dialect postgresql|mysql or set default_dialect")?;
    Dialect::from_name(name)
        .with_context(|| format!("Visual explain is not supported for dialect '{name}'"))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read plan from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
