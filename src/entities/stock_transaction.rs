//! Stock transaction entity - The append-only sale/purchase log.
//!
//! Each row is a permanent fact: it snapshots the catalog price at the time
//! of the movement so later price edits cannot rewrite history. Rows are
//! never updated; the only deletion path is the unit-removal cascade.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction log database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unit the movement happened in
    pub unit_id: String,
    /// Catalog product that was moved
    pub product_id: String,
    /// Movement kind: `"sale"` or `"purchase"`
    pub kind: String,
    /// Number of items moved, always > 0
    pub quantity: i64,
    /// Catalog price per item at the time of the movement
    pub unit_price: f64,
    /// `quantity` x `unit_price`, precomputed at append time
    pub total_amount: f64,
    /// Username of the staff member who performed the movement
    pub performed_by: String,
    /// When the movement happened
    pub timestamp: DateTimeUtc,
    /// Free-form note attached by the caller
    pub notes: String,
}

/// Defines relationships between StockTransaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one unit
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
    /// Each transaction references one catalog product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
