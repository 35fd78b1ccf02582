use clap::Parser;
use hearth::{FileStore, OsDetector, Stylesheet, ThemeConfig, ThemeManager};
use tracing::debug;

mod cli;
mod commands;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = ThemeConfig::new().storage_prefix(&cli.prefix);
    debug!(store = %cli.store.display(), prefix = %cli.prefix, "opening preferences");
    let store = FileStore::open(&cli.store);
    let mut manager = ThemeManager::new(config, store, &OsDetector, Stylesheet::new()?)?;

    let use_color = console::colors_enabled();
    let output = commands::execute(&mut manager, &cli.command, use_color)?;
    print!("{}", output);
    Ok(())
}
