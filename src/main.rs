// XMG keyboard control CLI

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Default: show status (needs only the settings file)
    let command = match cli.command.take() {
        None | Some(Commands::Status) => return commands::query::status(&cli),
        Some(command) => command,
    };

    let mut ctx = commands::open(&cli)?;

    match command {
        Commands::Status => {}

        // === Set Commands ===
        Commands::Brightness { value } => commands::set::brightness(&mut ctx, value)?,
        Commands::Color { value } => commands::set::color(&mut ctx, value)?,
        Commands::Timeout { value } => commands::set::timeout(&mut ctx, value)?,
        Commands::BootEffect => commands::set::boot_effect(&mut ctx)?,
        Commands::Restore => commands::set::restore(&mut ctx)?,

        // === Query Commands ===
        Commands::Sensors { channel, json } => {
            commands::query::sensors(&ctx, channel, json)?
        }

        // === Utility ===
        Commands::Raw {
            function,
            data,
            len,
        } => commands::raw::raw(&ctx, function, data.as_deref(), len)?,
    }

    Ok(())
}
