//! Unified error types and result handling for the warehouse ledger.
//!
//! Every fallible operation in the crate returns the [`Result`] alias defined
//! here. All variants are recoverable at the caller; the presentation layer
//! decides user messaging.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input or configuration (empty names, unparsable files, ...).
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// A quantity that must be strictly positive was zero or negative.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: i64,
    },

    /// A monetary or physical amount was negative or not finite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// A sale asked for more stock than the unit holds.
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        /// On-hand quantity at the time of the attempt
        available: i64,
        /// Quantity the sale asked for
        requested: i64,
    },

    /// No product with this id exists in the master catalog.
    #[error("Product not found: {product_id}")]
    ProductNotFound {
        /// The missing catalog id
        product_id: String,
    },

    /// No warehouse unit with this id exists.
    #[error("Unit not found: {unit_id}")]
    UnitNotFound {
        /// The missing unit id
        unit_id: String,
    },

    /// No stock entry exists for this (unit, product) pair.
    #[error("Stock entry not found for unit {unit_id}, product {product_id}")]
    StockEntryNotFound {
        /// Unit half of the composite key
        unit_id: String,
        /// Product half of the composite key
        product_id: String,
    },

    /// No user with this username exists.
    #[error("User not found: {username}")]
    UserNotFound {
        /// The missing username
        username: String,
    },

    /// A user with this username already exists.
    #[error("Username already taken: {username}")]
    DuplicateUsername {
        /// The colliding username
        username: String,
    },

    /// Unit deletion blocked because staff are still assigned to it.
    #[error("Unit {unit_id} still has {staff_count} staff member(s) assigned")]
    UnitHasStaff {
        /// The unit that was to be deleted
        unit_id: String,
        /// Number of users still assigned
        staff_count: u64,
    },

    /// Password hashing or verification failed at the argon2 layer.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Description from the hashing backend
        message: String,
    },

    /// I/O error (seed file reading).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any error bubbling up from the database layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
