//! Stock ledger business logic - per-unit quantity state and its mutation path.
//!
//! This module owns the only write path for stock entries: [`adjust`] applies a
//! sale or purchase, updates the running gain, and appends the matching
//! transaction log record, all inside one database transaction. Entry creation
//! goes through [`initialize_entry`], which product and unit creation fan out
//! over so that every (unit, product) pair always has an entry.

use std::collections::HashMap;

use crate::{
    entities::{Product, StockEntry, product, stock_entry, stock_transaction},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// The two kinds of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOperation {
    /// Stock leaves the unit; revenue is added to the running gain
    Sale,
    /// Stock enters the unit; the purchase outlay is subtracted from the gain
    Purchase,
}

impl StockOperation {
    /// Returns the string stored in the transaction log's `kind` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
        }
    }

    /// Parses a stored `kind` string back into an operation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sale" => Some(Self::Sale),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }
}

/// Search filters for [`query`]. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    /// Case-insensitive substring match on the product name
    pub name_contains: Option<String>,
    /// Exact catalog id match
    pub product_id: Option<String>,
    /// Lower bound on on-hand quantity (inclusive)
    pub quantity_min: Option<i64>,
    /// Upper bound on on-hand quantity (inclusive)
    pub quantity_max: Option<i64>,
}

/// Field to order [`query`] results by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSortField {
    /// Product name
    Name,
    /// On-hand quantity
    Quantity,
    /// Cumulative sold quantity
    SoldQuantity,
}

/// Sort specification for [`query`].
#[derive(Debug, Clone, Copy)]
pub struct StockSort {
    /// Field to order by
    pub field: StockSortField,
    /// Reverse the order when true
    pub descending: bool,
}

impl Default for StockSort {
    fn default() -> Self {
        Self {
            field: StockSortField::Name,
            descending: false,
        }
    }
}

/// One row of a stock listing: the mutable entry joined with its catalog data.
#[derive(Debug, Clone)]
pub struct StockRow {
    /// The per-unit quantity record
    pub entry: stock_entry::Model,
    /// The master catalog row it references
    pub product: product::Model,
}

/// Applies a sale or purchase to a stock entry and appends the matching
/// transaction log record.
///
/// The entry mutation and the log append run inside one database transaction:
/// a failure anywhere rolls back both, so the ledger and the log cannot drift
/// apart. The quantity/gain mutation itself is a relative SQL update
/// (`SET quantity = quantity - delta`), re-guarded by a `quantity >= delta`
/// condition for sales, so concurrent adjusts against the same entry cannot
/// lose updates.
///
/// # Errors
/// - [`Error::InvalidQuantity`] if `quantity` is not strictly positive
/// - [`Error::StockEntryNotFound`] if no entry exists for (unit, product)
/// - [`Error::ProductNotFound`] if the catalog row is missing
/// - [`Error::InsufficientStock`] if a sale exceeds the on-hand quantity;
///   the entry is left untouched
#[allow(clippy::cast_precision_loss)]
pub async fn adjust(
    db: &DatabaseConnection,
    unit_id: &str,
    product_id: &str,
    quantity: i64,
    operation: StockOperation,
    performed_by: &str,
    notes: Option<String>,
) -> Result<(stock_entry::Model, stock_transaction::Model)> {
    use sea_orm::sea_query::Expr;

    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let entry = StockEntry::find_by_id((unit_id.to_owned(), product_id.to_owned()))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::StockEntryNotFound {
            unit_id: unit_id.to_owned(),
            product_id: product_id.to_owned(),
        })?;

    let product = Product::find_by_id(product_id.to_owned())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            product_id: product_id.to_owned(),
        })?;

    let now = chrono::Utc::now();

    let unit_price = match operation {
        StockOperation::Sale => {
            if entry.quantity < quantity {
                return Err(Error::InsufficientStock {
                    available: entry.quantity,
                    requested: quantity,
                });
            }

            let revenue = quantity as f64 * product.selling_price;
            let update = StockEntry::update_many()
                .col_expr(
                    stock_entry::Column::Quantity,
                    Expr::col(stock_entry::Column::Quantity).sub(quantity),
                )
                .col_expr(
                    stock_entry::Column::SoldQuantity,
                    Expr::col(stock_entry::Column::SoldQuantity).add(quantity),
                )
                .col_expr(
                    stock_entry::Column::UnitGain,
                    Expr::col(stock_entry::Column::UnitGain).add(revenue),
                )
                .col_expr(stock_entry::Column::LastUpdated, Expr::value(now))
                .filter(stock_entry::Column::UnitId.eq(unit_id))
                .filter(stock_entry::Column::ProductId.eq(product_id))
                // Guard re-checked at the store so a concurrent sale cannot
                // push the quantity below zero
                .filter(stock_entry::Column::Quantity.gte(quantity))
                .exec(&txn)
                .await?;

            if update.rows_affected == 0 {
                return Err(Error::InsufficientStock {
                    available: entry.quantity,
                    requested: quantity,
                });
            }

            product.selling_price
        }
        StockOperation::Purchase => {
            let outlay = quantity as f64 * product.purchase_price;
            StockEntry::update_many()
                .col_expr(
                    stock_entry::Column::Quantity,
                    Expr::col(stock_entry::Column::Quantity).add(quantity),
                )
                .col_expr(
                    stock_entry::Column::UnitGain,
                    Expr::col(stock_entry::Column::UnitGain).sub(outlay),
                )
                .col_expr(stock_entry::Column::LastUpdated, Expr::value(now))
                .filter(stock_entry::Column::UnitId.eq(unit_id))
                .filter(stock_entry::Column::ProductId.eq(product_id))
                .exec(&txn)
                .await?;

            product.purchase_price
        }
    };

    let transaction = crate::core::transactions::append(
        &txn,
        unit_id,
        product_id,
        operation,
        quantity,
        unit_price,
        performed_by,
        notes,
    )
    .await?;

    let updated_entry = StockEntry::find_by_id((unit_id.to_owned(), product_id.to_owned()))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::StockEntryNotFound {
            unit_id: unit_id.to_owned(),
            product_id: product_id.to_owned(),
        })?;

    txn.commit().await?;

    Ok((updated_entry, transaction))
}

/// Creates or resets the stock entry for a (unit, product) pair.
///
/// Idempotent upsert: an existing entry is reset to the given quantity with
/// zero sold quantity and zero gain. Product and unit creation invoke this
/// for every counterpart row, inside their own transactions, which is what
/// guarantees the total-coverage invariant.
///
/// # Errors
/// Returns [`Error::InvalidQuantity`] for a negative quantity, or a database
/// error from the underlying upsert.
pub async fn initialize_entry<C>(
    conn: &C,
    unit_id: &str,
    product_id: &str,
    quantity: i64,
) -> Result<stock_entry::Model>
where
    C: ConnectionTrait,
{
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let now = chrono::Utc::now();
    let existing = StockEntry::find_by_id((unit_id.to_owned(), product_id.to_owned()))
        .one(conn)
        .await?;

    if let Some(entry) = existing {
        let mut active: stock_entry::ActiveModel = entry.into();
        active.quantity = Set(quantity);
        active.sold_quantity = Set(0);
        active.unit_gain = Set(0.0);
        active.last_updated = Set(now);
        active.update(conn).await.map_err(Into::into)
    } else {
        let entry = stock_entry::ActiveModel {
            unit_id: Set(unit_id.to_owned()),
            product_id: Set(product_id.to_owned()),
            quantity: Set(quantity),
            sold_quantity: Set(0),
            unit_gain: Set(0.0),
            last_updated: Set(now),
        };
        entry.insert(conn).await.map_err(Into::into)
    }
}

/// Returns the stock entries of a unit joined with their catalog rows,
/// filtered and sorted. Read-only.
///
/// Quantity bounds and the exact product id are pushed into the SQL query;
/// the name substring match (case-insensitive) and the sort run on the joined
/// rows. The sort is stable.
pub async fn query(
    db: &DatabaseConnection,
    unit_id: &str,
    filter: &StockFilter,
    sort: StockSort,
) -> Result<Vec<StockRow>> {
    let mut select = StockEntry::find().filter(stock_entry::Column::UnitId.eq(unit_id));

    if let Some(product_id) = &filter.product_id {
        select = select.filter(stock_entry::Column::ProductId.eq(product_id.as_str()));
    }
    if let Some(min) = filter.quantity_min {
        select = select.filter(stock_entry::Column::Quantity.gte(min));
    }
    if let Some(max) = filter.quantity_max {
        select = select.filter(stock_entry::Column::Quantity.lte(max));
    }

    let entries = select.all(db).await?;

    let catalog: HashMap<String, product::Model> = Product::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    let needle = filter.name_contains.as_deref().map(str::to_lowercase);

    let mut rows: Vec<StockRow> = entries
        .into_iter()
        .filter_map(|entry| {
            let product = catalog.get(&entry.product_id)?.clone();
            if let Some(needle) = &needle {
                if !product.name.to_lowercase().contains(needle) {
                    return None;
                }
            }
            Some(StockRow { entry, product })
        })
        .collect();

    rows.sort_by(|a, b| {
        let ordering = match sort.field {
            StockSortField::Name => a.product.name.cmp(&b.product.name),
            StockSortField::Quantity => a.entry.quantity.cmp(&b.entry.quantity),
            StockSortField::SoldQuantity => a.entry.sold_quantity.cmp(&b.entry.sold_quantity),
        };
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    Ok(rows)
}

/// Returns the company-wide on-hand quantity of a product, summed over all
/// units. Used by the catalog overview listing.
pub async fn total_quantity_for_product(db: &DatabaseConnection, product_id: &str) -> Result<i64> {
    let entries = StockEntry::find()
        .filter(stock_entry::Column::ProductId.eq(product_id))
        .order_by_asc(stock_entry::Column::UnitId)
        .all(db)
        .await?;

    Ok(entries.iter().map(|e| e.quantity).sum())
}
