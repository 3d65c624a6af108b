//! Country persistence core.
//! Defines the `Country` record, the engine-agnostic `CountryStore` contract
//! and its SQLite implementation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::country::{Country, CountryBuilder, CountryValidationError};
pub use repo::country_repo::{CountryStore, SqliteCountryStore, StoreError, StoreResult};

/// Returns the crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
