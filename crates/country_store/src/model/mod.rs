//! Domain model for country records.
//!
//! # Responsibility
//! - Define the canonical `Country` value handed to and returned by stores.
//!
//! # Invariants
//! - Every `Country` carries its required fields; absence is a construction
//!   error, never a default.
//! - Values are immutable once built.

pub mod country;
