use std::path::PathBuf;

use carelink_cli::cli::{run, CliCommand};
use carelink_core::config::CoreConfig;
use carelink_core::tracing_setup::init_stderr_tracing;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "carelink-cli")]
#[command(about = "Command line for Carelink messaging")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, short, global = true)]
    pretty: bool,

    /// Path to JSON config file (dataDir, apiBase, pollIntervalSecs, statusTtlMs)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Remove the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// List conversations with unread counts
    Threads,

    /// Open a conversation and mark it read
    Open {
        /// Counterpart user id
        other_id: u64,
        /// Display name until the counterpart's messages carry one
        #[arg(long)]
        name: Option<String>,
    },

    /// Send a message
    Send {
        /// Counterpart user id
        other_id: u64,
        /// Message text
        body: String,
    },

    /// Poll and print each refresh as a JSON line
    Watch,
}

impl From<Commands> for CliCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Login { email, password } => CliCommand::Login { email, password },
            Commands::Logout => CliCommand::Logout,
            Commands::Whoami => CliCommand::Whoami,
            Commands::Threads => CliCommand::Threads,
            Commands::Open { other_id, name } => CliCommand::Open { other_id, name },
            Commands::Send { other_id, body } => CliCommand::Send { other_id, body },
            Commands::Watch => CliCommand::Watch,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_stderr_tracing("carelink-cli");

    let config = match CoreConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout();
    if let Err(e) = run(cli.command.into(), &config, cli.pretty, &mut stdout).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
