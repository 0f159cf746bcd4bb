/// Database configuration and connection management
pub mod database;

/// Optional seed data loading from seed.toml
pub mod seed;
