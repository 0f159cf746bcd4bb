//! Product entity - Represents the master product catalog.
//!
//! Catalog rows are unit-independent: one row defines a product's physical
//! attributes and pricing for the whole company. Per-unit quantities live in
//! the `stock_entries` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Master catalog database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Catalog id in the form `P` + zero-padded 4-digit decimal (e.g. "P0001")
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Human-readable product name
    pub name: String,
    /// Weight of a single item
    pub weight: f64,
    /// Storage volume taken up by a single item
    pub volume: f64,
    /// Free-form category used for grouping and statistics
    pub category: String,
    /// Price the company pays per item when purchasing stock
    pub purchase_price: f64,
    /// Price a unit charges per item when selling
    pub selling_price: f64,
    /// Manufacturer name
    pub manufacturer: String,
    /// When the catalog row was created
    pub created_at: DateTimeUtc,
    /// When the catalog row was last edited
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One catalog product has a stock entry in every unit
    #[sea_orm(has_many = "super::stock_entry::Entity")]
    StockEntries,
    /// One catalog product appears in many transactions
    #[sea_orm(has_many = "super::stock_transaction::Entity")]
    Transactions,
}

impl Related<super::stock_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockEntries.def()
    }
}

impl Related<super::stock_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
