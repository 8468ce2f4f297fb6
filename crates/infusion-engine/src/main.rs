//! # Infusion
//!
//! Validates a recipe pack: loads the item registry and every recipe file,
//! registers the recipes and prints a JSON report.
//!
//! Usage: `infusion [config.toml]` (defaults to `infusion.toml`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use infusion_crafting::InfusionSystem;
use infusion_engine::{InfusionConfig, PackReport, RecipeLoader, Registries, CONFIG_FILE};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let base = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let config = InfusionConfig::load_from(&config_path).relative_to(&base);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_filter))?)
        .init();

    info!("Infusion pack validator {}", env!("CARGO_PKG_VERSION"));

    let registries = if config.registry_path.exists() {
        Registries::load(&config.registry_path)
            .with_context(|| format!("loading {}", config.registry_path.display()))?
    } else {
        warn!(
            "Item registry {} not found, starting empty",
            config.registry_path.display()
        );
        Registries::new()
    };

    let mut loader =
        RecipeLoader::new(&config.recipe_path, registries).with_default_policy(config.default_policy);
    loader
        .load_all()
        .with_context(|| format!("loading recipes from {}", config.recipe_path.display()))?;

    let mut system = InfusionSystem::new();
    loader.register_with_system(&mut system);
    info!("{} infusion recipes registered", system.len());

    let report = PackReport::from_loader(&loader);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if config.strict && report.has_errors() {
        bail!("{} recipe files or recipes were rejected", report.stats.errors);
    }
    Ok(())
}
