//! Transaction log business logic - the append-only sale/purchase history.
//!
//! Records are permanent facts: [`append`] is the only write path and nothing
//! ever updates a row. The stock ledger drives `append` from inside its own
//! transaction so that every successful adjust produces exactly one log
//! record with a matching quantity and price snapshot.

use crate::{
    core::stock::StockOperation,
    entities::{StockTransaction, stock_transaction},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, QuerySelect, Set, prelude::*};

/// Default number of records returned by [`query`] when no limit is given.
pub const DEFAULT_QUERY_LIMIT: u64 = 100;

/// Filters for [`query`]. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only records at or after this instant
    pub since: Option<DateTimeUtc>,
    /// Only records at or before this instant
    pub until: Option<DateTimeUtc>,
    /// Only records performed by this username
    pub performed_by: Option<String>,
    /// Only records of this movement kind
    pub kind: Option<StockOperation>,
    /// Maximum number of records, newest first ([`DEFAULT_QUERY_LIMIT`] if unset)
    pub limit: Option<u64>,
}

/// Appends one immutable record to the transaction log.
///
/// Generic over the connection so the stock ledger can call it inside its
/// adjust transaction. `total_amount` is computed here, once, from the
/// quantity and the price snapshot the caller observed.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] if `quantity` is not strictly positive,
/// or a database error from the insert.
#[allow(clippy::too_many_arguments, clippy::cast_precision_loss)]
pub async fn append<C>(
    conn: &C,
    unit_id: &str,
    product_id: &str,
    kind: StockOperation,
    quantity: i64,
    unit_price: f64,
    performed_by: &str,
    notes: Option<String>,
) -> Result<stock_transaction::Model>
where
    C: ConnectionTrait,
{
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let record = stock_transaction::ActiveModel {
        unit_id: Set(unit_id.to_owned()),
        product_id: Set(product_id.to_owned()),
        kind: Set(kind.as_str().to_owned()),
        quantity: Set(quantity),
        unit_price: Set(unit_price),
        total_amount: Set(quantity as f64 * unit_price),
        performed_by: Set(performed_by.to_owned()),
        timestamp: Set(chrono::Utc::now()),
        notes: Set(notes.unwrap_or_default()),
        ..Default::default()
    };

    record.insert(conn).await.map_err(Into::into)
}

/// Returns a unit's transaction records, newest first, bounded by the
/// filter's limit. Read-only.
pub async fn query(
    db: &DatabaseConnection,
    unit_id: &str,
    filter: &TransactionFilter,
) -> Result<Vec<stock_transaction::Model>> {
    let mut select = StockTransaction::find()
        .filter(stock_transaction::Column::UnitId.eq(unit_id));

    if let Some(since) = filter.since {
        select = select.filter(stock_transaction::Column::Timestamp.gte(since));
    }
    if let Some(until) = filter.until {
        select = select.filter(stock_transaction::Column::Timestamp.lte(until));
    }
    if let Some(performed_by) = &filter.performed_by {
        select = select.filter(stock_transaction::Column::PerformedBy.eq(performed_by.as_str()));
    }
    if let Some(kind) = filter.kind {
        select = select.filter(stock_transaction::Column::Kind.eq(kind.as_str()));
    }

    select
        .order_by_desc(stock_transaction::Column::Timestamp)
        .limit(filter.limit.unwrap_or(DEFAULT_QUERY_LIMIT))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the most recent records for one product in one unit, newest
/// first. Backs the product-details history view.
pub async fn recent_for_product(
    db: &DatabaseConnection,
    unit_id: &str,
    product_id: &str,
    limit: u64,
) -> Result<Vec<stock_transaction::Model>> {
    StockTransaction::find()
        .filter(stock_transaction::Column::UnitId.eq(unit_id))
        .filter(stock_transaction::Column::ProductId.eq(product_id))
        .order_by_desc(stock_transaction::Column::Timestamp)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}
