//! Country domain model.
//!
//! # Responsibility
//! - Define the immutable `Country` record mirrored by the `countries` table.
//! - Enforce required-field invariants at construction and deserialization.
//!
//! # Invariants
//! - `country_id`, `country_code`, `name` and `region_id` are always present.
//! - Optional fields keep "unset" (`None`) distinct from zero/empty values.
//! - Float fields, when set, are finite.
//! - No field can be mutated after construction; use `to_builder()` to derive
//!   a changed copy.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure raised while constructing a `Country`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryValidationError {
    /// A required field was never provided. Carries the column name.
    MissingField(&'static str),
    /// A float field holds NaN or an infinity. SQLite cannot keep NaN apart
    /// from NULL, so such values are refused up front.
    NonFiniteField(&'static str),
}

impl Display for CountryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required country field `{field}`"),
            Self::NonFiniteField(field) => {
                write!(f, "country field `{field}` must be a finite number")
            }
        }
    }
}

impl Error for CountryValidationError {}

/// One country record.
///
/// `Country::builder()` is the all-fields constructor; `Country::new` covers
/// the common case where only the required fields are known.
/// `region_id` is a plain back-reference; the region itself is not modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CountryBuilder")]
pub struct Country {
    country_id: String,
    country_code: String,
    name: String,
    official_name: Option<String>,
    population: Option<i32>,
    area_sq_km: Option<f32>,
    latitude: Option<f32>,
    longitude: Option<f32>,
    timezone: Option<String>,
    region_id: String,
}

impl Country {
    /// Creates a country with only the required fields set.
    pub fn new(
        country_id: impl Into<String>,
        country_code: impl Into<String>,
        name: impl Into<String>,
        region_id: impl Into<String>,
    ) -> Self {
        Self {
            country_id: country_id.into(),
            country_code: country_code.into(),
            name: name.into(),
            official_name: None,
            population: None,
            area_sq_km: None,
            latitude: None,
            longitude: None,
            timezone: None,
            region_id: region_id.into(),
        }
    }

    /// Starts an empty builder. `build()` fails until every required field
    /// has been set.
    pub fn builder() -> CountryBuilder {
        CountryBuilder::default()
    }

    /// Returns a builder pre-filled with this country's values.
    pub fn to_builder(&self) -> CountryBuilder {
        CountryBuilder {
            country_id: Some(self.country_id.clone()),
            country_code: Some(self.country_code.clone()),
            name: Some(self.name.clone()),
            official_name: self.official_name.clone(),
            population: self.population,
            area_sq_km: self.area_sq_km,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone.clone(),
            region_id: Some(self.region_id.clone()),
        }
    }

    pub fn country_id(&self) -> &str {
        &self.country_id
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn official_name(&self) -> Option<&str> {
        self.official_name.as_deref()
    }

    pub fn population(&self) -> Option<i32> {
        self.population
    }

    pub fn area_sq_km(&self) -> Option<f32> {
        self.area_sq_km
    }

    pub fn latitude(&self) -> Option<f32> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f32> {
        self.longitude
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }
}

/// Staged construction for `Country`.
///
/// Doubles as the serde intermediate, so payloads missing a required field
/// are rejected with the same `CountryValidationError` as direct callers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CountryBuilder {
    pub(crate) country_id: Option<String>,
    pub(crate) country_code: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) official_name: Option<String>,
    pub(crate) population: Option<i32>,
    pub(crate) area_sq_km: Option<f32>,
    pub(crate) latitude: Option<f32>,
    pub(crate) longitude: Option<f32>,
    pub(crate) timezone: Option<String>,
    pub(crate) region_id: Option<String>,
}

impl CountryBuilder {
    pub fn country_id(mut self, value: impl Into<String>) -> Self {
        self.country_id = Some(value.into());
        self
    }

    pub fn country_code(mut self, value: impl Into<String>) -> Self {
        self.country_code = Some(value.into());
        self
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn official_name(mut self, value: Option<String>) -> Self {
        self.official_name = value;
        self
    }

    pub fn population(mut self, value: Option<i32>) -> Self {
        self.population = value;
        self
    }

    pub fn area_sq_km(mut self, value: Option<f32>) -> Self {
        self.area_sq_km = value;
        self
    }

    pub fn latitude(mut self, value: Option<f32>) -> Self {
        self.latitude = value;
        self
    }

    pub fn longitude(mut self, value: Option<f32>) -> Self {
        self.longitude = value;
        self
    }

    pub fn timezone(mut self, value: Option<String>) -> Self {
        self.timezone = value;
        self
    }

    pub fn region_id(mut self, value: impl Into<String>) -> Self {
        self.region_id = Some(value.into());
        self
    }

    /// Finishes construction.
    ///
    /// # Errors
    /// - `MissingField` for the first unset required field, in column order.
    /// - `NonFiniteField` when `area_sq_km`, `latitude` or `longitude` is NaN
    ///   or infinite.
    pub fn build(self) -> Result<Country, CountryValidationError> {
        let country_id = required(self.country_id, "country_id")?;
        let country_code = required(self.country_code, "country_code")?;
        let name = required(self.name, "name")?;
        finite(self.area_sq_km, "area_sq_km")?;
        finite(self.latitude, "latitude")?;
        finite(self.longitude, "longitude")?;
        let region_id = required(self.region_id, "region_id")?;

        Ok(Country {
            country_id,
            country_code,
            name,
            official_name: self.official_name,
            population: self.population,
            area_sq_km: self.area_sq_km,
            latitude: self.latitude,
            longitude: self.longitude,
            timezone: self.timezone,
            region_id,
        })
    }
}

impl TryFrom<CountryBuilder> for Country {
    type Error = CountryValidationError;

    fn try_from(value: CountryBuilder) -> Result<Self, Self::Error> {
        value.build()
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, CountryValidationError> {
    value.ok_or(CountryValidationError::MissingField(field))
}

fn finite(value: Option<f32>, field: &'static str) -> Result<(), CountryValidationError> {
    match value {
        Some(number) if !number.is_finite() => {
            Err(CountryValidationError::NonFiniteField(field))
        }
        _ => Ok(()),
    }
}
