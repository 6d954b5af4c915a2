//! Minbar CLI - Command-line interface
//!
//! Provides command-line access to the audio delivery server.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "minbar")]
#[command(about = "An audio lecture delivery server")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::handle_command(cli.command).await?;

    Ok(())
}
