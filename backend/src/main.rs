use std::path::PathBuf;

use clap::{Parser, Subcommand};

use app::App;
use init::config::CONFIG_PATH;

pub mod app;
pub mod controller;
pub mod endpoint;
pub mod entity;
pub mod init;
#[cfg(test)]
pub mod test;
pub mod util;

/// Role-based course catalog
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// path of the config file, generated when missing
    #[arg(short, long, env = "CONFIG_PATH", default_value = CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// open the interactive menu (default)
    Run,
    /// create config and database, then exit
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = App::new(&cli.config).await?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => app.start().await?,
        Command::Init => {
            tracing::info!(config = %cli.config.display(), "initialized");
            eprintln!("Initialized with config {}", cli.config.display());
        }
    };

    Ok(())
}
