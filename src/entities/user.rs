//! User entity - Staff accounts (admin, supervisors, employees).
//!
//! Supervisors and employees are tied to a unit; the admin has no unit.
//! Passwords are stored as argon2 PHC strings, never in plain text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff account database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique login name
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    /// Argon2 PHC hash of the password
    pub password_hash: String,
    /// First name
    pub name: String,
    /// Surname
    pub surname: String,
    /// Role: `"admin"`, `"supervisor"` or `"employee"`
    pub role: String,
    /// Unit the account is assigned to, None for the admin
    pub unit_id: Option<String>,
    /// When the account was created
    pub created_at: DateTimeUtc,
    /// When the account was last edited
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each non-admin account belongs to one unit
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
