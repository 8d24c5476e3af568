use anyhow::Result;
use clap::Parser;

use geom_export::cli::{self, Cli};

fn main() -> Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    cli::run(Cli::parse())?;

    Ok(())
}
