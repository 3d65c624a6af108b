//! Country store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and load `Country` values through the `countries` table.
//! - Translate driver failures into `StoreError` kinds callers can match on.
//!
//! # Invariants
//! - Insert and select use the same fixed column order.
//! - Every successful insert ends with an explicit commit. On an autocommit
//!   connection the insert gets its own transaction, rolled back on failure.
//!   On a connection already in manual-commit mode (open transaction) the
//!   insert joins it and the store issues `COMMIT`; a failed statement leaves
//!   that transaction open and uncommitted for the caller.
//! - Read paths reject rows that cannot form a valid `Country`.

use crate::db::DbError;
use crate::model::country::{Country, CountryBuilder};
use log::{error, info};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const COUNTRY_INSERT_SQL: &str = "INSERT INTO countries (
    country_id,
    country_code,
    name,
    official_name,
    population,
    area_sq_km,
    latitude,
    longitude,
    timezone,
    region_id
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);";

const COUNTRY_SELECT_SQL: &str = "SELECT
    country_id,
    country_code,
    name,
    official_name,
    population,
    area_sq_km,
    latitude,
    longitude,
    timezone,
    region_id
FROM countries
WHERE country_id = ?1;";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by `CountryStore` operations.
#[derive(Debug)]
pub enum StoreError {
    /// Statement execution or commit failed in the backing store.
    Storage(DbError),
    /// No row matched the requested country ID.
    NotFound(String),
    /// A persisted row could not be mapped back to a `Country`.
    InvalidData(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "country storage failure: {err}"),
            Self::NotFound(id) => write!(f, "country with ID {id} not found"),
            Self::InvalidData(message) => write!(f, "invalid persisted country data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Storage contract for country records.
///
/// Implementations must not expose driver types; callers only see `Country`
/// and `StoreError`.
pub trait CountryStore {
    /// Persists a new country.
    ///
    /// # Errors
    /// - `Storage` when the backend rejects or fails the write, including a
    ///   duplicate `country_id`.
    fn insert_country(&mut self, country: &Country) -> StoreResult<()>;

    /// Loads the country with `country_id`.
    ///
    /// # Errors
    /// - `NotFound` when no row matches.
    /// - `Storage` when the query itself fails.
    /// - `InvalidData` when the stored row violates `Country` invariants.
    fn get_country(&self, country_id: &str) -> StoreResult<Country>;
}

/// SQLite-backed country store.
///
/// Owns exactly one connection for its lifetime. Use one instance per
/// concurrent caller.
pub struct SqliteCountryStore {
    conn: Connection,
}

impl SqliteCountryStore {
    /// Wraps `conn`. The `countries` table must already exist.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Releases the owned connection.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl CountryStore for SqliteCountryStore {
    fn insert_country(&mut self, country: &Country) -> StoreResult<()> {
        let started_at = Instant::now();

        match insert_and_commit(&mut self.conn, country) {
            Ok(()) => {
                info!(
                    "event=country_insert module=repo status=ok country_id={} duration_ms={}",
                    country.country_id(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=country_insert module=repo status=error country_id={} duration_ms={} error_code=country_insert_failed error={}",
                    country.country_id(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn get_country(&self, country_id: &str) -> StoreResult<Country> {
        let started_at = Instant::now();
        let result = select_country(&self.conn, country_id);

        match &result {
            Ok(_) => info!(
                "event=country_get module=repo status=ok country_id={} duration_ms={}",
                country_id,
                started_at.elapsed().as_millis()
            ),
            Err(StoreError::NotFound(_)) => info!(
                "event=country_get module=repo status=not_found country_id={} duration_ms={}",
                country_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=country_get module=repo status=error country_id={} duration_ms={} error_code=country_get_failed error={}",
                country_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        result
    }
}

fn insert_and_commit(conn: &mut Connection, country: &Country) -> rusqlite::Result<()> {
    if !conn.is_autocommit() {
        execute_insert(conn, country)?;
        return conn.execute_batch("COMMIT;");
    }

    // Dropping `tx` on an error path rolls it back.
    let tx = conn.transaction()?;
    execute_insert(&tx, country)?;
    tx.commit()
}

fn execute_insert(conn: &Connection, country: &Country) -> rusqlite::Result<()> {
    conn.execute(
        COUNTRY_INSERT_SQL,
        params![
            country.country_id(),
            country.country_code(),
            country.name(),
            country.official_name(),
            country.population(),
            country.area_sq_km(),
            country.latitude(),
            country.longitude(),
            country.timezone(),
            country.region_id(),
        ],
    )?;
    Ok(())
}

fn select_country(conn: &Connection, country_id: &str) -> StoreResult<Country> {
    let mut stmt = conn.prepare(COUNTRY_SELECT_SQL)?;
    let mut rows = stmt.query([country_id])?;

    match rows.next()? {
        Some(row) => parse_country_row(row),
        None => Err(StoreError::NotFound(country_id.to_string())),
    }
}

fn parse_country_row(row: &Row<'_>) -> StoreResult<Country> {
    let population = match column::<Option<i64>>(row, 4)? {
        Some(value) => Some(i32::try_from(value).map_err(|_| {
            StoreError::InvalidData(format!(
                "population `{value}` out of range in countries.population"
            ))
        })?),
        None => None,
    };

    let builder = CountryBuilder {
        country_id: column(row, 0)?,
        country_code: column(row, 1)?,
        name: column(row, 2)?,
        official_name: column(row, 3)?,
        population,
        area_sq_km: column(row, 5)?,
        latitude: column(row, 6)?,
        longitude: column(row, 7)?,
        timezone: column(row, 8)?,
        region_id: column(row, 9)?,
    };

    builder
        .build()
        .map_err(|err| StoreError::InvalidData(format!("{err} in countries row")))
}

// A value of the wrong storage class is bad data, not a backend failure.
fn column<T: FromSql>(row: &Row<'_>, idx: usize) -> StoreResult<T> {
    row.get(idx).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(_, name, kind) => {
            StoreError::InvalidData(format!("unexpected {kind} value in countries.{name}"))
        }
        other => other.into(),
    })
}
