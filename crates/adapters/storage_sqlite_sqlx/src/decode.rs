//! Helpers shared by the row wrappers to turn `TEXT` columns back into
//! domain values.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use smartcity_domain::time::Timestamp;

fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Parse a typed id stored as its hyphenated UUID string.
pub(crate) fn id<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(decode_err)
}

/// Parse an enum stored as its serde label (`"active"`, `"°C"`, ...).
pub(crate) fn label<T: DeserializeOwned>(value: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(&format!("\"{value}\"")).map_err(decode_err)
}

pub(crate) fn json<T: DeserializeOwned>(value: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(value).map_err(decode_err)
}

pub(crate) fn timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.to_utc())
        .map_err(decode_err)
}
