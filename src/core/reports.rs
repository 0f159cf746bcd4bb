//! Aggregation business logic - financial and operational summaries.
//!
//! Every function here is a pure recomputation over the current stock ledger,
//! catalog, and transaction log. Nothing is cached or incrementally
//! maintained: calling a summary twice with no intervening mutation yields
//! identical results. Reads run without locks and may observe a snapshot
//! that is already stale by the time it is returned; summaries are advisory.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::{
    core::stock::StockOperation,
    entities::{Product, StockEntry, StockTransaction, User, product, stock_entry,
        stock_transaction, user},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, prelude::*};

/// Financial position of one unit.
#[derive(Debug, Clone)]
pub struct UnitFinancialSummary {
    /// Cumulative net effect of completed sales minus purchase outlays
    pub realized_gain: f64,
    /// Value of current unsold stock at today's selling prices
    pub potential_gain: f64,
}

/// Storage utilization of one unit.
#[derive(Debug, Clone)]
pub struct VolumeUsage {
    /// Volume currently occupied by stock
    pub used: f64,
    /// The unit's total capacity
    pub capacity: f64,
    /// `used / capacity` as a percentage, 0 when capacity is 0
    pub percent: f64,
}

/// Company-wide totals across all units.
#[derive(Debug, Clone)]
pub struct CompanySummary {
    /// Sum of per-unit realized gains
    pub realized_gain: f64,
    /// Sum of per-unit potential gains
    pub potential_gain: f64,
    /// Total occupied volume over total capacity, as a percentage
    pub volume_usage_percent: f64,
    /// Number of warehouse units
    pub unit_count: usize,
    /// Number of non-admin staff accounts
    pub staff_count: u64,
}

/// Sales totals for one employee in one unit.
#[derive(Debug, Clone)]
pub struct EmployeePerformance {
    /// The employee's username
    pub username: String,
    /// "Name Surname" when the account exists, the username otherwise
    pub display_name: String,
    /// Unit the sales happened in
    pub unit_id: String,
    /// Sum of `total_amount` over the employee's sales
    pub total_sales: f64,
    /// Sum of quantities over the employee's sales
    pub total_quantity: i64,
    /// Number of sale transactions
    pub transaction_count: usize,
}

/// Sales totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySales {
    /// Calendar year
    pub year: i32,
    /// Calendar month, 1-12
    pub month: u32,
    /// Sum of sale amounts in the month
    pub total_amount: f64,
    /// Sum of sold quantities in the month
    pub total_quantity: i64,
}

/// On-hand quantity per product category, company-wide.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    /// Category label from the catalog
    pub category: String,
    /// Total on-hand quantity across all units
    pub total_quantity: i64,
}

async fn catalog_by_id(db: &DatabaseConnection) -> Result<BTreeMap<String, product::Model>> {
    Ok(Product::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect())
}

async fn entries_for_unit(
    db: &DatabaseConnection,
    unit_id: &str,
) -> Result<Vec<stock_entry::Model>> {
    StockEntry::find()
        .filter(stock_entry::Column::UnitId.eq(unit_id))
        .order_by_asc(stock_entry::Column::ProductId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Computes the financial position of one unit from its stock entries and
/// today's catalog prices.
///
/// # Errors
/// Returns [`Error::UnitNotFound`] for an unknown unit id.
#[allow(clippy::cast_precision_loss)]
pub async fn unit_financial_summary(
    db: &DatabaseConnection,
    unit_id: &str,
) -> Result<UnitFinancialSummary> {
    require_unit(db, unit_id).await?;

    let entries = entries_for_unit(db, unit_id).await?;
    let catalog = catalog_by_id(db).await?;

    let mut realized_gain = 0.0;
    let mut potential_gain = 0.0;
    for entry in &entries {
        realized_gain += entry.unit_gain;
        if let Some(product) = catalog.get(&entry.product_id) {
            potential_gain += entry.quantity as f64 * product.selling_price;
        }
    }

    Ok(UnitFinancialSummary {
        realized_gain,
        potential_gain,
    })
}

/// Computes the storage utilization of one unit.
///
/// # Errors
/// Returns [`Error::UnitNotFound`] for an unknown unit id.
#[allow(clippy::cast_precision_loss)]
pub async fn unit_volume_usage(db: &DatabaseConnection, unit_id: &str) -> Result<VolumeUsage> {
    let unit = crate::core::units::get_unit(db, unit_id)
        .await?
        .ok_or_else(|| Error::UnitNotFound {
            unit_id: unit_id.to_owned(),
        })?;

    let entries = entries_for_unit(db, unit_id).await?;
    let catalog = catalog_by_id(db).await?;

    let used: f64 = entries
        .iter()
        .filter_map(|entry| {
            let product = catalog.get(&entry.product_id)?;
            Some(entry.quantity as f64 * product.volume)
        })
        .sum();

    let percent = if unit.volume_capacity > 0.0 {
        used / unit.volume_capacity * 100.0
    } else {
        0.0
    };

    Ok(VolumeUsage {
        used,
        capacity: unit.volume_capacity,
        percent,
    })
}

/// Sums financial summaries and volume usage over all units.
///
/// The volume percentage is total occupied volume over total capacity,
/// yielding 0 for a company with no capacity (no units, or all capacities 0).
pub async fn company_summary(db: &DatabaseConnection) -> Result<CompanySummary> {
    let units = crate::core::units::list_units(db).await?;

    let mut realized_gain = 0.0;
    let mut potential_gain = 0.0;
    let mut volume_used = 0.0;
    let mut volume_capacity = 0.0;

    for unit in &units {
        let financial = unit_financial_summary(db, &unit.id).await?;
        realized_gain += financial.realized_gain;
        potential_gain += financial.potential_gain;

        let volume = unit_volume_usage(db, &unit.id).await?;
        volume_used += volume.used;
        volume_capacity += unit.volume_capacity;
    }

    let volume_usage_percent = if volume_capacity > 0.0 {
        volume_used / volume_capacity * 100.0
    } else {
        0.0
    };

    let staff_count = User::find()
        .filter(user::Column::Role.ne("admin"))
        .count(db)
        .await?;

    Ok(CompanySummary {
        realized_gain,
        potential_gain,
        volume_usage_percent,
        unit_count: units.len(),
        staff_count,
    })
}

/// Sums one employee's sale transactions within a unit.
///
/// Only `sale` records count; purchases are a supervisor activity and never
/// contribute to performance figures.
pub async fn employee_performance(
    db: &DatabaseConnection,
    unit_id: &str,
    username: &str,
) -> Result<EmployeePerformance> {
    let sales = StockTransaction::find()
        .filter(stock_transaction::Column::UnitId.eq(unit_id))
        .filter(stock_transaction::Column::PerformedBy.eq(username))
        .filter(stock_transaction::Column::Kind.eq(StockOperation::Sale.as_str()))
        .all(db)
        .await?;

    let total_sales = sales.iter().map(|t| t.total_amount).sum();
    let total_quantity = sales.iter().map(|t| t.quantity).sum();

    let display_name = crate::core::users::get_user(db, username)
        .await?
        .map_or_else(
            || username.to_owned(),
            |account| format!("{} {}", account.name, account.surname),
        );

    Ok(EmployeePerformance {
        username: username.to_owned(),
        display_name,
        unit_id: unit_id.to_owned(),
        total_sales,
        total_quantity,
        transaction_count: sales.len(),
    })
}

/// Ranks all employees company-wide by total sales, descending.
///
/// Employees without any sales are omitted. The sort is stable, so ties keep
/// their first-seen order: units in id order, employees in username order
/// within each unit.
pub async fn employee_ranking(db: &DatabaseConnection) -> Result<Vec<EmployeePerformance>> {
    use crate::core::users::Role;

    let units = crate::core::units::list_units(db).await?;

    let mut ranking = Vec::new();
    for unit in &units {
        let employees =
            crate::core::users::users_in_unit(db, &unit.id, Some(Role::Employee)).await?;
        for employee in &employees {
            let performance = employee_performance(db, &unit.id, &employee.username).await?;
            if performance.total_sales > 0.0 {
                ranking.push(performance);
            }
        }
    }

    ranking.sort_by(|a, b| {
        b.total_sales
            .partial_cmp(&a.total_sales)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(ranking)
}

/// Buckets company-wide sale transactions by calendar month, summing amount
/// and quantity per bucket. Buckets come back chronologically ascending for
/// charting. The default window is the trailing 365 days.
pub async fn monthly_sales(
    db: &DatabaseConnection,
    since: Option<DateTimeUtc>,
    until: Option<DateTimeUtc>,
) -> Result<Vec<MonthlySales>> {
    let until = until.unwrap_or_else(chrono::Utc::now);
    let since = since.unwrap_or_else(|| until - chrono::Duration::days(365));

    let sales = StockTransaction::find()
        .filter(stock_transaction::Column::Kind.eq(StockOperation::Sale.as_str()))
        .filter(stock_transaction::Column::Timestamp.gte(since))
        .filter(stock_transaction::Column::Timestamp.lte(until))
        .all(db)
        .await?;

    let mut buckets: BTreeMap<(i32, u32), (f64, i64)> = BTreeMap::new();
    for sale in &sales {
        let key = (sale.timestamp.year(), sale.timestamp.month());
        let bucket = buckets.entry(key).or_insert((0.0, 0));
        bucket.0 += sale.total_amount;
        bucket.1 += sale.quantity;
    }

    Ok(buckets
        .into_iter()
        .map(|((year, month), (total_amount, total_quantity))| MonthlySales {
            year,
            month,
            total_amount,
            total_quantity,
        })
        .collect())
}

/// Sums on-hand quantities per product category across all units.
pub async fn category_breakdown(db: &DatabaseConnection) -> Result<Vec<CategoryCount>> {
    let entries = StockEntry::find().all(db).await?;
    let catalog = catalog_by_id(db).await?;

    let mut buckets: BTreeMap<String, i64> = BTreeMap::new();
    for entry in &entries {
        if let Some(product) = catalog.get(&entry.product_id) {
            *buckets.entry(product.category.clone()).or_insert(0) += entry.quantity;
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(category, total_quantity)| CategoryCount {
            category,
            total_quantity,
        })
        .collect())
}

async fn require_unit(db: &DatabaseConnection, unit_id: &str) -> Result<()> {
    crate::core::units::get_unit(db, unit_id)
        .await?
        .ok_or_else(|| Error::UnitNotFound {
            unit_id: unit_id.to_owned(),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::stock::{self, StockOperation};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_unit_summary_scenario() -> Result<()> {
        // Capacity 100, volume 2, purchase 3, selling 5
        let (db, unit, product) = setup_with_stock().await?;

        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            10,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            4,
            StockOperation::Sale,
            "employee1",
            None,
        )
        .await?;

        let financial = unit_financial_summary(&db, &unit.id).await?;
        // Gain: -10*3 + 4*5 = -10; unsold 6 items at 5 each
        assert_eq!(financial.realized_gain, -10.0);
        assert_eq!(financial.potential_gain, 30.0);

        let volume = unit_volume_usage(&db, &unit.id).await?;
        assert_eq!(volume.used, 12.0);
        assert_eq!(volume.capacity, 100.0);
        assert_eq!(volume.percent, 12.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unit_summary_is_pure() -> Result<()> {
        let (db, unit, product) = setup_with_stock().await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            7,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;

        let first = unit_financial_summary(&db, &unit.id).await?;
        let second = unit_financial_summary(&db, &unit.id).await?;
        assert_eq!(first.realized_gain, second.realized_gain);
        assert_eq!(first.potential_gain, second.potential_gain);

        Ok(())
    }

    #[tokio::test]
    async fn test_unit_summary_unknown_unit() -> Result<()> {
        let db = setup_test_db().await?;
        let result = unit_financial_summary(&db, "999").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UnitNotFound { unit_id: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_company_summary_sums_units() -> Result<()> {
        let db = setup_test_db().await?;
        let unit_a = create_test_unit(&db, "Depot A").await?;
        let unit_b = create_test_unit(&db, "Depot B").await?;
        let product = create_test_product(&db, "Shipping Crate").await?;

        stock::adjust(
            &db,
            &unit_a.id,
            &product.id,
            10,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit_b.id,
            &product.id,
            5,
            StockOperation::Purchase,
            "supervisor2",
            None,
        )
        .await?;

        let summary = company_summary(&db).await?;
        assert_eq!(summary.unit_count, 2);
        // 15 items purchased at 3 each, nothing sold
        assert_eq!(summary.realized_gain, -45.0);
        assert_eq!(summary.potential_gain, 75.0);
        // 15 items of volume 2 over 200 capacity
        assert_eq!(summary.volume_usage_percent, 15.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_company_summary_empty_store() -> Result<()> {
        let db = setup_test_db().await?;
        let summary = company_summary(&db).await?;
        assert_eq!(summary.unit_count, 0);
        assert_eq!(summary.staff_count, 0);
        // Zero total capacity yields 0, not a division error
        assert_eq!(summary.volume_usage_percent, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_employee_performance_counts_only_sales() -> Result<()> {
        let (db, unit, product) = setup_with_stock().await?;
        create_test_employee(&db, "jane.doe.001", &unit.id).await?;

        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            10,
            StockOperation::Purchase,
            "jane.doe.001",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            3,
            StockOperation::Sale,
            "jane.doe.001",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            2,
            StockOperation::Sale,
            "jane.doe.001",
            None,
        )
        .await?;

        let performance = employee_performance(&db, &unit.id, "jane.doe.001").await?;
        assert_eq!(performance.total_quantity, 5);
        assert_eq!(performance.total_sales, 25.0);
        assert_eq!(performance.transaction_count, 2);
        assert_eq!(performance.display_name, "Test Employee");

        Ok(())
    }

    #[tokio::test]
    async fn test_employee_ranking_stable_on_ties() -> Result<()> {
        let (db, unit, product) = setup_with_stock().await?;
        create_test_employee(&db, "ann.kay.001", &unit.id).await?;
        create_test_employee(&db, "bob.ray.001", &unit.id).await?;
        create_test_employee(&db, "idle.one.001", &unit.id).await?;

        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            10,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;
        // Equal sales for both active employees
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            2,
            StockOperation::Sale,
            "bob.ray.001",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            2,
            StockOperation::Sale,
            "ann.kay.001",
            None,
        )
        .await?;

        let ranking = employee_ranking(&db).await?;
        // Idle employee omitted; tie keeps username scan order
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].username, "ann.kay.001");
        assert_eq!(ranking[1].username, "bob.ray.001");
        assert_eq!(ranking[0].total_sales, ranking[1].total_sales);

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_sales_buckets() -> Result<()> {
        let (db, unit, product) = setup_with_stock().await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            10,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            2,
            StockOperation::Sale,
            "employee1",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            3,
            StockOperation::Sale,
            "employee1",
            None,
        )
        .await?;

        let buckets = monthly_sales(&db, None, None).await?;
        // Both sales land in the current month; purchases are excluded
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total_quantity, 5);
        assert_eq!(buckets[0].total_amount, 25.0);

        let now = chrono::Utc::now();
        assert_eq!(buckets[0].year, now.year());
        assert_eq!(buckets[0].month, now.month());

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_sales_respects_window() -> Result<()> {
        let (db, unit, product) = setup_with_stock().await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            10,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &product.id,
            2,
            StockOperation::Sale,
            "employee1",
            None,
        )
        .await?;

        // A window that ends before the sale sees nothing
        let past_window_end = chrono::Utc::now() - chrono::Duration::days(30);
        let buckets = monthly_sales(&db, None, Some(past_window_end)).await?;
        assert!(buckets.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_category_breakdown() -> Result<()> {
        let db = setup_test_db().await?;
        let unit = create_test_unit(&db, "Depot A").await?;
        let crate_product = create_test_product(&db, "Shipping Crate").await?;
        let tool = create_custom_product(&db, "Torque Wrench", "tools", 1.0, 12.0, 20.0).await?;

        stock::adjust(
            &db,
            &unit.id,
            &crate_product.id,
            4,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;
        stock::adjust(
            &db,
            &unit.id,
            &tool.id,
            2,
            StockOperation::Purchase,
            "supervisor1",
            None,
        )
        .await?;

        let breakdown = category_breakdown(&db).await?;
        assert_eq!(
            breakdown,
            vec![
                CategoryCount {
                    category: "general".to_string(),
                    total_quantity: 4
                },
                CategoryCount {
                    category: "tools".to_string(),
                    total_quantity: 2
                },
            ]
        );

        Ok(())
    }
}
