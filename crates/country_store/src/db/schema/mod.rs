//! `countries` table definition.

use crate::db::DbResult;
use rusqlite::Connection;

const COUNTRIES_DDL: &str = include_str!("countries.sql");

/// Creates the `countries` table when it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(COUNTRIES_DDL)?;
    Ok(())
}
