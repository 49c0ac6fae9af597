//! config command - Show the effective configuration

use crate::cli::Context;
use crate::core::config::Config;
use anyhow::{Context as _, Result};

/// Print the effective configuration as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    let config = Config::load(ctx.config.as_deref()).context("Failed to load config")?;

    match config.loaded_from() {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no config file found, using defaults"),
    }
    print!("{}", config.to_toml().context("Failed to render config")?);

    Ok(())
}
