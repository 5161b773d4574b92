// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per collection, plus the read-side reports.

pub mod help_requests;
pub mod menus;
pub mod notifications;
pub mod orders;
pub mod providers;
pub mod reports;
pub mod reviews;
pub mod users;

use rusqlite::types::Type;

/// Parse a TEXT column holding a string-keyed enum.
pub(crate) fn col_enum<T>(idx: usize, value: String) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr<Err = strum::ParseError>,
{
    value
        .parse()
        .map_err(|e: strum::ParseError| rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            Box::new(e),
        ))
}

/// Parse a TEXT column holding a JSON document.
pub(crate) fn col_json<T: serde::de::DeserializeOwned>(
    idx: usize,
    value: String,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(&value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Parse a nullable TEXT column holding a JSON document.
pub(crate) fn col_json_opt<T: serde::de::DeserializeOwned>(
    idx: usize,
    value: Option<String>,
) -> Result<Option<T>, rusqlite::Error> {
    value.map(|v| col_json(idx, v)).transpose()
}

/// Serialize a value into a JSON TEXT parameter.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
