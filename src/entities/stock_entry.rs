//! Stock entry entity - The mutable per-(unit, product) quantity record.
//!
//! Every catalog product has exactly one entry per unit (fan-out
//! initialization at product/unit creation guarantees total coverage).
//! Entries are only ever mutated through the stock ledger's adjust
//! operation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-unit stock database model, keyed by (`unit_id`, `product_id`)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_entries")]
pub struct Model {
    /// Unit half of the composite key
    #[sea_orm(primary_key, auto_increment = false)]
    pub unit_id: String,
    /// Product half of the composite key
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: String,
    /// On-hand quantity, never negative
    pub quantity: i64,
    /// Cumulative quantity ever sold from this unit
    pub sold_quantity: i64,
    /// Running net gain: sales add revenue, purchases subtract outlay.
    /// Cost-basis accounting - goes negative while stock is bought but unsold.
    pub unit_gain: f64,
    /// When this entry was last mutated
    pub last_updated: DateTimeUtc,
}

/// Defines relationships between StockEntry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one unit
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
    /// Each entry references one catalog product
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
