use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "multitimer", version, about = "Coordinated countdown timers")]
struct Cli {
    /// Timer document to operate on (defaults to the configured document)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage timers in the document
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Group-wide start behavior
    Group {
        #[command(subcommand)]
        action: commands::group::GroupAction,
    },
    /// CLI preference management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print the document
    Show(commands::show::ShowArgs),
    /// Run the timers until they finish
    Run(commands::run::RunArgs),
    /// Rewrite an old document at the current format version
    Migrate,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, cli.file.as_deref()),
        Commands::Group { action } => commands::group::run(action, cli.file.as_deref()),
        Commands::Config { action } => commands::config::run(action),
        Commands::Show(args) => commands::show::run(args, cli.file.as_deref()),
        Commands::Run(args) => commands::run::run(args, cli.file.as_deref()),
        Commands::Migrate => commands::migrate::run(cli.file.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
