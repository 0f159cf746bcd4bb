//! Shared test utilities for the warehouse ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{catalog, catalog::NewProduct, units, users, users::NewUser, users::Role},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Default attributes for a test product.
///
/// # Defaults
/// * `weight`: 1.0
/// * `volume`: 2.0
/// * `category`: "general"
/// * `purchase_price`: 3.0
/// * `selling_price`: 5.0
/// * `manufacturer`: "Acme"
#[must_use]
pub fn test_product_attrs(name: &str) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        weight: 1.0,
        volume: 2.0,
        category: "general".to_string(),
        purchase_price: 3.0,
        selling_price: 5.0,
        manufacturer: "Acme".to_string(),
    }
}

/// Creates a test product with the defaults from [`test_product_attrs`].
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::product::Model> {
    catalog::create_product(db, test_product_attrs(name)).await
}

/// Creates a test product with custom category, volume, and prices.
/// Use this when a test needs to distinguish products by attributes.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
    volume: f64,
    purchase_price: f64,
    selling_price: f64,
) -> Result<entities::product::Model> {
    catalog::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            category: category.to_string(),
            volume,
            purchase_price,
            selling_price,
            ..test_product_attrs(name)
        },
    )
    .await
}

/// Creates a test unit with a volume capacity of 100.0.
pub async fn create_test_unit(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::unit::Model> {
    units::create_unit(db, name.to_string(), 100.0).await
}

/// Creates a test unit with a custom volume capacity.
pub async fn create_custom_unit(
    db: &DatabaseConnection,
    name: &str,
    volume_capacity: f64,
) -> Result<entities::unit::Model> {
    units::create_unit(db, name.to_string(), volume_capacity).await
}

/// Creates a test employee assigned to the given unit.
///
/// # Defaults
/// * `password`: "secret123"
/// * `name`: "Test"
/// * `surname`: "Employee"
pub async fn create_test_employee(
    db: &DatabaseConnection,
    username: &str,
    unit_id: &str,
) -> Result<entities::user::Model> {
    users::create_user(
        db,
        NewUser {
            username: username.to_string(),
            password: "secret123".to_string(),
            name: "Test".to_string(),
            surname: "Employee".to_string(),
            role: Role::Employee,
            unit_id: Some(unit_id.to_string()),
        },
    )
    .await
}

/// Sets up a complete test environment with one unit and one product.
/// The fan-out at creation time guarantees their stock entry exists.
/// Returns (db, unit, product) for common ledger test scenarios.
pub async fn setup_with_stock() -> Result<(
    DatabaseConnection,
    entities::unit::Model,
    entities::product::Model,
)> {
    let db = setup_test_db().await?;
    let unit = create_test_unit(&db, "Test Depot").await?;
    let product = create_test_product(&db, "Test Product").await?;
    Ok((db, unit, product))
}
