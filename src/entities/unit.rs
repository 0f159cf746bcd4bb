//! Unit entity - Represents a warehouse location with finite volume capacity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Warehouse unit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    /// Unit id as a zero-padded 3-digit decimal string (e.g. "001")
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Human-readable unit name
    pub name: String,
    /// Total storage volume the unit can hold, always > 0
    pub volume_capacity: f64,
    /// When the unit was created
    pub created_at: DateTimeUtc,
    /// When the unit was last edited
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Unit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One unit holds a stock entry per catalog product
    #[sea_orm(has_many = "super::stock_entry::Entity")]
    StockEntries,
    /// One unit accumulates many transactions
    #[sea_orm(has_many = "super::stock_transaction::Entity")]
    Transactions,
    /// Supervisors and employees assigned to this unit
    #[sea_orm(has_many = "super::user::Entity")]
    Users,
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

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
