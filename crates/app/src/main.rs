use clap::Parser;
use engine::{Ledger, Snapshot};

use crate::{cli::Cli, commands::Effect};

mod cli;
mod commands;
mod error;
mod render;
mod settings;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "quota={level},engine={level}",
            level = settings.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let mut ledger = Ledger::from(Snapshot::load(&settings.store_path)?);
    tracing::debug!(
        store = %settings.store_path,
        people = ledger.people().len(),
        transactions = ledger.transactions().len(),
        "ledger loaded"
    );

    let today = chrono::Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();
    let effect = commands::run(cli.command, &mut ledger, &settings, today, &mut stdout)?;

    if effect == Effect::Changed {
        ledger.snapshot().save(&settings.store_path)?;
        tracing::debug!(store = %settings.store_path, "ledger saved");
    }

    Ok(())
}
