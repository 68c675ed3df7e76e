//! JSON helpers mapping serde failures onto [`StrataError::Serde`].

use serde::{de::DeserializeOwned, Serialize};
use strata_core::{ErrorInfo, StrataError};

fn serde_error(code: &str, err: impl ToString) -> StrataError {
    StrataError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serializes a value into pretty-printed JSON.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String, StrataError> {
    serde_json::to_string_pretty(value).map_err(|err| serde_error("json-serialize", err))
}

/// Deserializes a value from JSON, running the same validation as the constructors.
pub fn from_json_str<T: DeserializeOwned>(data: &str) -> Result<T, StrataError> {
    serde_json::from_str(data).map_err(|err| serde_error("json-deserialize", err))
}
