//! Catalog business logic - the master product definitions.
//!
//! Catalog rows are company-wide: one row per product, carrying its pricing
//! and physical attributes. Creating a product fans a zero-quantity stock
//! entry out to every existing unit so that reads never have to handle a
//! missing (unit, product) pair.

use crate::{
    entities::{Product, Unit, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Attributes of a product to be created.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Item weight, >= 0
    pub weight: f64,
    /// Item volume, >= 0
    pub volume: f64,
    /// Category label
    pub category: String,
    /// Purchase price per item, >= 0
    pub purchase_price: f64,
    /// Selling price per item, >= 0
    pub selling_price: f64,
    /// Manufacturer name
    pub manufacturer: String,
}

/// Price/attribute edits for an existing product. Unset fields are kept.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    /// New name
    pub name: Option<String>,
    /// New weight
    pub weight: Option<f64>,
    /// New volume
    pub volume: Option<f64>,
    /// New category
    pub category: Option<String>,
    /// New purchase price
    pub purchase_price: Option<f64>,
    /// New selling price
    pub selling_price: Option<f64>,
    /// New manufacturer
    pub manufacturer: Option<String>,
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Config {
            message: format!("Product {field} cannot be empty"),
        });
    }
    Ok(())
}

fn validate_amount(value: f64) -> Result<()> {
    if value < 0.0 || !value.is_finite() {
        return Err(Error::InvalidAmount { amount: value });
    }
    Ok(())
}

/// Creates a new catalog product and fans out a zero-quantity stock entry to
/// every existing unit.
///
/// The id is allocated by incrementing the highest existing `P####` id;
/// allocation, insert, and fan-out share one transaction, so concurrent
/// creates serialize at the store instead of racing to the same id.
///
/// # Errors
/// Returns [`Error::Config`] for empty text fields, [`Error::InvalidAmount`]
/// for negative or non-finite numeric fields, or a database error.
pub async fn create_product(
    db: &DatabaseConnection,
    attrs: NewProduct,
) -> Result<product::Model> {
    validate_text("name", &attrs.name)?;
    validate_text("category", &attrs.category)?;
    validate_text("manufacturer", &attrs.manufacturer)?;
    validate_amount(attrs.weight)?;
    validate_amount(attrs.volume)?;
    validate_amount(attrs.purchase_price)?;
    validate_amount(attrs.selling_price)?;

    let txn = db.begin().await?;

    let product_id = next_product_id(&txn).await?;
    let now = chrono::Utc::now();

    let model = product::ActiveModel {
        id: Set(product_id.clone()),
        name: Set(attrs.name.trim().to_string()),
        weight: Set(attrs.weight),
        volume: Set(attrs.volume),
        category: Set(attrs.category.trim().to_string()),
        purchase_price: Set(attrs.purchase_price),
        selling_price: Set(attrs.selling_price),
        manufacturer: Set(attrs.manufacturer.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    // Total-coverage invariant: every unit gets an entry for the new product
    let units = Unit::find().all(&txn).await?;
    for unit in &units {
        crate::core::stock::initialize_entry(&txn, &unit.id, &product_id, 0).await?;
    }

    txn.commit().await?;

    Ok(model)
}

/// Allocates the next catalog id (`P0001` for an empty store).
async fn next_product_id<C>(conn: &C) -> Result<String>
where
    C: sea_orm::ConnectionTrait,
{
    // Zero-padded ids sort lexicographically in numeric order
    let last = Product::find()
        .order_by_desc(product::Column::Id)
        .one(conn)
        .await?;

    match last {
        Some(p) => {
            let n: u32 = p
                .id
                .trim_start_matches('P')
                .parse()
                .map_err(|_| Error::Config {
                    message: format!("Malformed product id in catalog: {}", p.id),
                })?;
            Ok(format!("P{:04}", n + 1))
        }
        None => Ok("P0001".to_string()),
    }
}

/// Retrieves a catalog product by id.
pub async fn get_product(
    db: &DatabaseConnection,
    product_id: &str,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id.to_owned())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns catalog products ordered by id, optionally filtered by a
/// case-insensitive name substring.
pub async fn list_products(
    db: &DatabaseConnection,
    name_filter: Option<&str>,
) -> Result<Vec<product::Model>> {
    let products = Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;

    match name_filter {
        Some(needle) => {
            let needle = needle.to_lowercase();
            Ok(products
                .into_iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .collect())
        }
        None => Ok(products),
    }
}

/// Applies price/attribute edits to an existing product.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if the id is unknown, plus the same
/// validation errors as [`create_product`] for the fields being changed.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: &str,
    update: ProductUpdate,
) -> Result<product::Model> {
    let existing = get_product(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            product_id: product_id.to_owned(),
        })?;

    if let Some(name) = &update.name {
        validate_text("name", name)?;
    }
    if let Some(category) = &update.category {
        validate_text("category", category)?;
    }
    if let Some(manufacturer) = &update.manufacturer {
        validate_text("manufacturer", manufacturer)?;
    }
    for amount in [
        update.weight,
        update.volume,
        update.purchase_price,
        update.selling_price,
    ]
    .into_iter()
    .flatten()
    {
        validate_amount(amount)?;
    }

    let mut active: product::ActiveModel = existing.into();
    if let Some(name) = update.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(weight) = update.weight {
        active.weight = Set(weight);
    }
    if let Some(volume) = update.volume {
        active.volume = Set(volume);
    }
    if let Some(category) = update.category {
        active.category = Set(category.trim().to_string());
    }
    if let Some(purchase_price) = update.purchase_price {
        active.purchase_price = Set(purchase_price);
    }
    if let Some(selling_price) = update.selling_price {
        active.selling_price = Set(selling_price);
    }
    if let Some(manufacturer) = update.manufacturer {
        active.manufacturer = Set(manufacturer.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await.map_err(Into::into)
}
