//! Serde support for partial updates.

use serde::{Deserialize, Deserializer};

/// Deserialize a patch field that tells an absent key apart from `null`.
///
/// Used with `#[serde(default)]`: a missing key stays `None`, `null` becomes
/// `Some(None)` (clear the field) and a value becomes `Some(Some(value))`.
///
/// # Errors
///
/// Propagates the error of deserializing `T`.
#[allow(clippy::option_option)]
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
