//! Bootstrap binary: initializes the database, seeds the admin account and
//! any configured seed data, then logs a company summary.

use std::env;
use std::path::Path;

use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use warehouse_ledger::{config, core, errors::Result};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and create tables from the entity definitions
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Ensure the admin account exists
    let admin_user = env::var("WAREHOUSE_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let admin_password =
        env::var("WAREHOUSE_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    if core::users::ensure_admin(&db, &admin_user, &admin_password).await? {
        warn!(
            username = %admin_user,
            "Created default admin account; change its password before going live"
        );
    }

    // 5. Apply optional seed data
    let seed_path = env::var("WAREHOUSE_SEED_FILE").unwrap_or_else(|_| "seed.toml".to_string());
    if let Some(seed) = config::seed::load_seed_config(Path::new(&seed_path))? {
        let (units_created, products_created) = config::seed::apply_seed(&db, &seed).await?;
        info!(units_created, products_created, "Seed data applied.");
    }

    // 6. Report where the company stands
    let summary = core::reports::company_summary(&db).await?;
    info!(
        units = summary.unit_count,
        staff = summary.staff_count,
        realized_gain = summary.realized_gain,
        potential_gain = summary.potential_gain,
        volume_usage_percent = summary.volume_usage_percent,
        "Warehouse ledger ready."
    );

    Ok(())
}
