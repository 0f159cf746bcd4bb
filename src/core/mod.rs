//! Core business logic - framework-agnostic warehouse inventory operations.
//!
//! Every function in these modules takes an explicit database handle; there
//! is no process-wide state. Mutations that span several rows run inside a
//! single `SeaORM` transaction.

/// Master product catalog operations
pub mod catalog;
/// Financial and operational aggregation
pub mod reports;
/// Per-unit stock ledger (the sale/purchase mutation path)
pub mod stock;
/// Append-only transaction log
pub mod transactions;
/// Warehouse unit management
pub mod units;
/// Staff accounts and authentication
pub mod users;
