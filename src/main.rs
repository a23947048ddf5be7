use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prs_core::constants::{DATA_DIR_ENV, POLICY_ENV};
use prs_core::{CoreConfig, Registry, RegistryStore};

mod menu;

use menu::Menu;

/// Main entry point for the interactive PRS console.
///
/// Starts with an empty registry; the operator loads saved data from the menu.
///
/// # Environment Variables
/// - `PRS_DATA_DIR`: Directory the registry files are saved to and loaded from (default: ".")
/// - `PRS_OBSERVATION_POLICY`: `strict` or `permissive` (default: "strict")
/// - `RUST_LOG`: Log filter; logs go to stderr
///
/// # Returns
/// * `Ok(())` - When the operator exits the menu
/// * `Err(anyhow::Error)` - If configuration is invalid or the console cannot be read/written
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cfg = CoreConfig::from_env_values(
        std::env::var(DATA_DIR_ENV).ok(),
        std::env::var(POLICY_ENV).ok(),
    )?;

    tracing::info!(
        data_dir = %cfg.data_dir().display(),
        policy = %cfg.policy(),
        "++ Starting PRS console"
    );

    let registry = Registry::new(cfg.policy());
    let store = RegistryStore::from_config(&cfg);

    let stdin = io::stdin();
    let mut menu = Menu::new(registry, store, stdin.lock(), io::stdout());
    menu.run()?;

    Ok(())
}
