//! Storefront command line

use std::io;

use crate::cli::{commands, config::Config, logging};

mod cli;

fn main() -> anyhow::Result<()> {
    // Help, version and usage errors are printed by clap
    let config = Config::load().unwrap_or_else(|error| error.exit());

    logging::init(&config.logging)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    commands::run(config, &mut out)
}
