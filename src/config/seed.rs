//! Seed data loading from a TOML file.
//!
//! A deployment can ship a `seed.toml` describing the initial warehouse
//! units and catalog products. The bootstrap binary applies it once at
//! startup; entries whose name already exists are skipped, so re-running
//! against a populated database is harmless.

use std::path::Path;

use serde::Deserialize;

use crate::core::{catalog, catalog::NewProduct, units};
use crate::errors::{Error, Result};
use sea_orm::DatabaseConnection;

/// Top-level structure of the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// Warehouse units to create
    #[serde(default)]
    pub units: Vec<UnitSeed>,
    /// Catalog products to create
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// One `[[units]]` block in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitSeed {
    /// Unit name
    pub name: String,
    /// Volume capacity, must be > 0
    pub volume_capacity: f64,
}

/// One `[[products]]` block in the seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSeed {
    /// Product name
    pub name: String,
    /// Item weight
    pub weight: f64,
    /// Item volume
    pub volume: f64,
    /// Category label
    pub category: String,
    /// Purchase price per item
    pub purchase_price: f64,
    /// Selling price per item
    pub selling_price: f64,
    /// Manufacturer name
    pub manufacturer: String,
}

/// Loads and parses the seed file, returning `None` when the file does not
/// exist (an absent seed file is not an error).
pub fn load_seed_config(path: &Path) -> Result<Option<SeedConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)?;
    let config: SeedConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file {}: {e}", path.display()),
    })?;

    Ok(Some(config))
}

/// Applies the seed data, creating units and products that do not exist yet.
///
/// Matching is by name: a unit or product whose name is already present is
/// skipped. Returns `(units_created, products_created)`.
pub async fn apply_seed(db: &DatabaseConnection, seed: &SeedConfig) -> Result<(usize, usize)> {
    let existing_units: Vec<String> = units::list_units(db)
        .await?
        .into_iter()
        .map(|u| u.name)
        .collect();

    let mut units_created = 0;
    for unit in &seed.units {
        if existing_units.iter().any(|n| n == &unit.name) {
            continue;
        }
        units::create_unit(db, unit.name.clone(), unit.volume_capacity).await?;
        units_created += 1;
    }

    let existing_products: Vec<String> = catalog::list_products(db, None)
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    let mut products_created = 0;
    for product in &seed.products {
        if existing_products.iter().any(|n| n == &product.name) {
            continue;
        }
        catalog::create_product(
            db,
            NewProduct {
                name: product.name.clone(),
                weight: product.weight,
                volume: product.volume,
                category: product.category.clone(),
                purchase_price: product.purchase_price,
                selling_price: product.selling_price,
                manufacturer: product.manufacturer.clone(),
            },
        )
        .await?;
        products_created += 1;
    }

    Ok((units_created, products_created))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const SAMPLE: &str = r#"
        [[units]]
        name = "Central Depot"
        volume_capacity = 500.0

        [[products]]
        name = "Pallet Jack"
        weight = 72.0
        volume = 4.5
        category = "equipment"
        purchase_price = 250.0
        selling_price = 410.0
        manufacturer = "LiftCo"
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config: SeedConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.units.len(), 1);
        assert_eq!(config.units[0].name, "Central Depot");
        assert_eq!(config.products.len(), 1);
        assert_eq!(config.products[0].manufacturer, "LiftCo");
    }

    #[test]
    fn test_parse_empty_seed_config() {
        // Both sections default to empty
        let config: SeedConfig = toml::from_str("").unwrap();
        assert!(config.units.is_empty());
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_load_missing_seed_file() -> Result<()> {
        let loaded = load_seed_config(Path::new("/nonexistent/seed.toml"))?;
        assert!(loaded.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_apply_seed_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SAMPLE).unwrap();

        let (units_created, products_created) = apply_seed(&db, &config).await?;
        assert_eq!(units_created, 1);
        assert_eq!(products_created, 1);

        // Second application finds everything by name and creates nothing
        let (units_created, products_created) = apply_seed(&db, &config).await?;
        assert_eq!(units_created, 0);
        assert_eq!(products_created, 0);

        assert_eq!(units::list_units(&db).await?.len(), 1);
        assert_eq!(catalog::list_products(&db, None).await?.len(), 1);

        Ok(())
    }
}
