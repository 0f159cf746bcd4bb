//! Unit business logic - warehouse locations and their lifecycle.
//!
//! Creating a unit fans a zero-quantity stock entry out to every catalog
//! product (the mirror image of product creation). Deletion requires
//! referential emptiness: a unit with staff assigned cannot be removed, and a
//! successful removal cascades to the unit's stock entries and transactions.

use crate::{
    entities::{Product, StockEntry, StockTransaction, Unit, User, stock_entry,
        stock_transaction, unit, user},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Creates a new warehouse unit and fans out a zero-quantity stock entry for
/// every catalog product.
///
/// The id is allocated by incrementing the highest existing 3-digit id;
/// allocation, insert, and fan-out share one transaction so concurrent
/// creates serialize at the store.
///
/// # Errors
/// Returns [`Error::Config`] for an empty name, [`Error::InvalidAmount`] for
/// a capacity that is not strictly positive and finite, or a database error.
pub async fn create_unit(
    db: &DatabaseConnection,
    name: String,
    volume_capacity: f64,
) -> Result<unit::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Unit name cannot be empty".to_string(),
        });
    }
    if volume_capacity <= 0.0 || !volume_capacity.is_finite() {
        return Err(Error::InvalidAmount {
            amount: volume_capacity,
        });
    }

    let txn = db.begin().await?;

    let unit_id = next_unit_id(&txn).await?;
    let now = chrono::Utc::now();

    let model = unit::ActiveModel {
        id: Set(unit_id.clone()),
        name: Set(name.trim().to_string()),
        volume_capacity: Set(volume_capacity),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    // Total-coverage invariant: the new unit gets an entry per product
    let products = Product::find().all(&txn).await?;
    for product in &products {
        crate::core::stock::initialize_entry(&txn, &unit_id, &product.id, 0).await?;
    }

    txn.commit().await?;

    Ok(model)
}

/// Allocates the next unit id ("001" for an empty store).
async fn next_unit_id<C>(conn: &C) -> Result<String>
where
    C: sea_orm::ConnectionTrait,
{
    let last = Unit::find().order_by_desc(unit::Column::Id).one(conn).await?;

    match last {
        Some(u) => {
            let n: u32 = u.id.parse().map_err(|_| Error::Config {
                message: format!("Malformed unit id in store: {}", u.id),
            })?;
            Ok(format!("{:03}", n + 1))
        }
        None => Ok("001".to_string()),
    }
}

/// Retrieves a unit by id.
pub async fn get_unit(db: &DatabaseConnection, unit_id: &str) -> Result<Option<unit::Model>> {
    Unit::find_by_id(unit_id.to_owned())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns all units ordered by id.
pub async fn list_units(db: &DatabaseConnection) -> Result<Vec<unit::Model>> {
    Unit::find()
        .order_by_asc(unit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a unit together with its stock entries and transactions.
///
/// # Errors
/// Returns [`Error::UnitNotFound`] if the id is unknown and
/// [`Error::UnitHasStaff`] if any supervisor or employee is still assigned
/// to the unit; in that case nothing is deleted.
pub async fn delete_unit(db: &DatabaseConnection, unit_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    Unit::find_by_id(unit_id.to_owned())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::UnitNotFound {
            unit_id: unit_id.to_owned(),
        })?;

    let staff_count = User::find()
        .filter(user::Column::UnitId.eq(unit_id))
        .count(&txn)
        .await?;
    if staff_count > 0 {
        return Err(Error::UnitHasStaff {
            unit_id: unit_id.to_owned(),
            staff_count,
        });
    }

    StockEntry::delete_many()
        .filter(stock_entry::Column::UnitId.eq(unit_id))
        .exec(&txn)
        .await?;
    StockTransaction::delete_many()
        .filter(stock_transaction::Column::UnitId.eq(unit_id))
        .exec(&txn)
        .await?;
    Unit::delete_by_id(unit_id.to_owned()).exec(&txn).await?;

    txn.commit().await?;

    Ok(())
}
