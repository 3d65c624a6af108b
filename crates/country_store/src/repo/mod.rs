//! Store contract and persistence implementations for countries.
//!
//! # Responsibility
//! - Define the engine-agnostic `CountryStore` contract.
//! - Keep SQL details inside the SQLite implementation.
//!
//! # Invariants
//! - Store APIs report `NotFound` separately from storage failures.
//! - Failed writes are returned to the caller, never only logged.

pub mod country_repo;
