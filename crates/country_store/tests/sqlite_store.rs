use country_store::db::{open_db, open_db_in_memory};
use country_store::{Country, CountryStore, SqliteCountryStore, StoreError};
use rusqlite::Connection;

fn seeded_store() -> SqliteCountryStore {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO countries (
            country_id, country_code, name, official_name, population,
            area_sq_km, latitude, longitude, timezone, region_id
        ) VALUES (
            'AUT', 'AT', 'Austria', 'Republic of Austria', 8935112,
            83871, 47.33, 13.33, 'Europe/Vienna', 'EU'
        );",
    )
    .unwrap();
    SqliteCountryStore::new(conn)
}

fn test_country() -> Country {
    Country::builder()
        .country_id("XYZ")
        .country_code("XZ")
        .name("mytest")
        .official_name(None)
        .population(Some(0))
        .area_sq_km(Some(0.0))
        .latitude(Some(0.0))
        .longitude(Some(0.0))
        .timezone(None)
        .region_id("EU")
        .build()
        .unwrap()
}

fn insert_then_get<S: CountryStore>(store: &mut S, country: &Country) -> Country {
    store.insert_country(country).unwrap();
    store.get_country(country.country_id()).unwrap()
}

#[test]
fn get_returns_seeded_country() {
    let store = seeded_store();

    let austria = store.get_country("AUT").unwrap();
    assert_eq!(austria.name(), "Austria");
    assert_eq!(austria.official_name(), Some("Republic of Austria"));
    assert_eq!(austria.population(), Some(8_935_112));
    assert_eq!(austria.area_sq_km(), Some(83_871.0));
    assert_eq!(austria.timezone(), Some("Europe/Vienna"));
    assert_eq!(austria.region_id(), "EU");
}

#[test]
fn insert_and_get_roundtrip() {
    let mut store = seeded_store();
    let expected = test_country();

    let loaded = insert_then_get(&mut store, &expected);
    assert_eq!(loaded, expected);
}

#[test]
fn roundtrip_preserves_every_optional_field() {
    let mut store = seeded_store();
    let expected = Country::builder()
        .country_id("NZL")
        .country_code("NZ")
        .name("New Zealand")
        .official_name(Some("New Zealand".to_string()))
        .population(Some(5_084_300))
        .area_sq_km(Some(268_021.0))
        .latitude(Some(-41.5))
        .longitude(Some(172.83))
        .timezone(Some("Pacific/Auckland".to_string()))
        .region_id("OC")
        .build()
        .unwrap();

    assert_eq!(insert_then_get(&mut store, &expected), expected);
}

#[test]
fn roundtrip_keeps_null_distinct_from_empty_and_zero() {
    let mut store = seeded_store();
    let unset = Country::new("NUL", "NU", "nulls", "EU");
    let empty = Country::new("EMP", "EM", "empties", "EU")
        .to_builder()
        .official_name(Some(String::new()))
        .timezone(Some(String::new()))
        .population(Some(0))
        .build()
        .unwrap();

    let loaded_unset = insert_then_get(&mut store, &unset);
    let loaded_empty = insert_then_get(&mut store, &empty);

    assert_eq!(loaded_unset.official_name(), None);
    assert_eq!(loaded_unset.population(), None);
    assert_eq!(loaded_unset.timezone(), None);
    assert_eq!(loaded_empty.official_name(), Some(""));
    assert_eq!(loaded_empty.population(), Some(0));
    assert_eq!(loaded_empty.timezone(), Some(""));

    let official_is_null: bool = store
        .connection()
        .query_row(
            "SELECT official_name IS NULL FROM countries WHERE country_id = 'NUL';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(official_is_null);
}

#[test]
fn get_unknown_id_returns_not_found() {
    let store = seeded_store();

    let err = store.get_country("NOPE").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(&err, StoreError::NotFound(id) if id == "NOPE"));
    assert_eq!(err.to_string(), "country with ID NOPE not found");
}

#[test]
fn duplicate_insert_returns_storage_error_and_keeps_original() {
    let mut store = seeded_store();
    let original = test_country();
    store.insert_country(&original).unwrap();

    let duplicate = original.to_builder().name("overwritten").build().unwrap();
    let err = store.insert_country(&duplicate).unwrap_err();
    match &err {
        StoreError::Storage(inner) => {
            assert!(inner.to_string().contains("UNIQUE"), "unexpected: {inner}")
        }
        other => panic!("expected storage error, got: {other}"),
    }

    assert_eq!(store.get_country("XYZ").unwrap(), original);
    assert!(store.connection().is_autocommit());
}

#[test]
fn query_failure_is_storage_error_not_not_found() {
    let conn = Connection::open_in_memory().unwrap();
    let store = SqliteCountryStore::new(conn);

    let err = store.get_country("AUT").unwrap_err();
    assert!(!err.is_not_found());
    assert!(matches!(err, StoreError::Storage(_)));
}

#[test]
fn insert_without_table_returns_storage_error() {
    let mut store = SqliteCountryStore::new(Connection::open_in_memory().unwrap());

    let err = store.insert_country(&test_country()).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
}

#[test]
fn insert_on_manual_commit_connection_commits() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("BEGIN;").unwrap();
    let mut store = SqliteCountryStore::new(conn);
    assert!(!store.connection().is_autocommit());

    store.insert_country(&test_country()).unwrap();

    assert!(store.connection().is_autocommit());
    assert_eq!(store.get_country("XYZ").unwrap(), test_country());
}

#[test]
fn failed_insert_on_manual_commit_connection_leaves_transaction_to_caller() {
    let mut store = seeded_store();
    store.insert_country(&test_country()).unwrap();
    store.connection().execute_batch("BEGIN;").unwrap();

    let duplicate = test_country().to_builder().name("overwritten").build().unwrap();
    let err = store.insert_country(&duplicate).unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));

    assert!(!store.connection().is_autocommit());
    store.connection().execute_batch("ROLLBACK;").unwrap();
    assert_eq!(store.get_country("XYZ").unwrap(), test_country());
}

#[test]
fn row_with_null_required_column_is_invalid_data() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE countries (
            country_id TEXT, country_code TEXT, name TEXT, official_name TEXT,
            population INTEGER, area_sq_km REAL, latitude REAL, longitude REAL,
            timezone TEXT, region_id TEXT
        );
        INSERT INTO countries (country_id, country_code, name, region_id)
        VALUES ('BAD', 'BD', NULL, 'EU');
        INSERT INTO countries (country_id, country_code, name, population, region_id)
        VALUES ('BIG', 'BG', 'big', 5000000000, 'EU');",
    )
    .unwrap();
    let store = SqliteCountryStore::new(conn);

    let err = store.get_country("BAD").unwrap_err();
    match err {
        StoreError::InvalidData(message) => assert!(message.contains("`name`")),
        other => panic!("expected invalid data, got: {other}"),
    }

    let err = store.get_country("BIG").unwrap_err();
    match err {
        StoreError::InvalidData(message) => assert!(message.contains("population")),
        other => panic!("expected invalid data, got: {other}"),
    }
}

#[test]
fn committed_insert_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("countries.db");

    let mut store = SqliteCountryStore::new(open_db(&path).unwrap());
    store.insert_country(&test_country()).unwrap();
    drop(store.into_inner());

    let reopened = SqliteCountryStore::new(open_db(&path).unwrap());
    assert_eq!(reopened.get_country("XYZ").unwrap(), test_country());
}

#[test]
fn row_with_wrong_storage_class_is_invalid_data() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE countries (
            country_id TEXT, country_code TEXT, name TEXT, official_name TEXT,
            population, area_sq_km, latitude, longitude,
            timezone TEXT, region_id TEXT
        );
        INSERT INTO countries (country_id, country_code, name, population, region_id)
        VALUES ('TXT', 'TX', 'text', 'many', 'EU');
        INSERT INTO countries (country_id, country_code, name, population, region_id)
        VALUES ('FRC', 'FR', 'fraction', 1.5, 'EU');
        INSERT INTO countries (country_id, country_code, name, latitude, region_id)
        VALUES ('LAT', 'LA', 'latitude', 'north', 'EU');",
    )
    .unwrap();
    let store = SqliteCountryStore::new(conn);

    for (id, column) in [("TXT", "population"), ("FRC", "population"), ("LAT", "latitude")] {
        match store.get_country(id).unwrap_err() {
            StoreError::InvalidData(message) => {
                assert!(message.contains(column), "unexpected message: {message}")
            }
            other => panic!("expected invalid data for {id}, got: {other}"),
        }
    }
}
