pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use crossterm::tty::IsTty;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "tasks")]
#[command(about = "Tasks CLI - manage your task board from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Tasks(commands::tasks::TaskCommands),

    #[command(about = "Authentication and token management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Colours for text output on a terminal, unless `NO_COLOR` is set
    pub fn use_color(&self) -> bool {
        matches!(self, OutputFormat::Text)
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_tty()
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Tasks(cmd) => commands::tasks::handle(cmd, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format).await,
    }
}
