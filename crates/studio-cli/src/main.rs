mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    calendar::CalendarSubcommand, config::ConfigSubcommand, content::ContentSubcommand,
    flag::FlagSubcommand, goal::GoalSubcommand, idea::IdeaSubcommand, pillar::PillarSubcommand,
    task::TaskSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "studio",
    about = "Content studio: pillars, calendar, task board, ideation and the billing/AI API",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .studio/)
    #[arg(long, global = true, env = "STUDIO_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize .studio/ in the current directory
    Init,

    /// Run the API server
    Serve {
        /// Port to listen on (default: config port, 3001)
        #[arg(long, env = "STUDIO_PORT")]
        port: Option<u16>,

        /// Open a browser at the health endpoint once listening
        #[arg(long)]
        open: bool,
    },

    /// Manage content pillars
    Pillar {
        #[command(subcommand)]
        subcommand: PillarSubcommand,
    },

    /// Manage content items inside a pillar
    Content {
        #[command(subcommand)]
        subcommand: ContentSubcommand,
    },

    /// Schedule content on the calendar
    Calendar {
        #[command(subcommand)]
        subcommand: CalendarSubcommand,
    },

    /// Manage the task board
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Manage goals
    Goal {
        #[command(subcommand)]
        subcommand: GoalSubcommand,
    },

    /// Edit the ideation table
    Idea {
        #[command(subcommand)]
        subcommand: IdeaSubcommand,
    },

    /// Toggle feature flags
    Flag {
        #[command(subcommand)]
        subcommand: FlagSubcommand,
    },

    /// Inspect and validate configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
        Commands::Pillar { subcommand } => cmd::pillar::run(&root, subcommand, cli.json),
        Commands::Content { subcommand } => cmd::content::run(&root, subcommand, cli.json),
        Commands::Calendar { subcommand } => cmd::calendar::run(&root, subcommand, cli.json),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Goal { subcommand } => cmd::goal::run(&root, subcommand, cli.json),
        Commands::Idea { subcommand } => cmd::idea::run(&root, subcommand, cli.json),
        Commands::Flag { subcommand } => cmd::flag::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
