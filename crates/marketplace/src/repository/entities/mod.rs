//! SeaORM entities.
//!
//! Nested sub-objects (addresses, image lists, order items) live in JSONB
//! columns and are decoded into domain structs on the way out.

pub mod admin_log;
pub mod booking;
pub mod order;
pub mod product;
pub mod product_variant;
pub mod seller;
pub mod seller_document;
pub mod service;
pub mod store;
pub mod subscription_plan;
pub mod user;

use std::str::FromStr;

use sea_orm::entity::prelude::Json;
use serde::{de::DeserializeOwned, Serialize};

/// Decode a JSON column, treating malformed data as the type's default.
pub(crate) fn from_json<T: DeserializeOwned + Default>(value: Json) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("Malformed JSON column: {}", e);
        T::default()
    })
}

/// Decode a nullable JSON column.
pub(crate) fn from_json_opt<T: DeserializeOwned + Default>(value: Option<Json>) -> Option<T> {
    value.filter(|v| !v.is_null()).map(from_json)
}

/// Encode a value for a JSON column.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Json {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::error!("Failed to encode JSON column: {}", e);
        Json::Null
    })
}

/// Parse a stored enum string, logging and falling back on unknown values.
pub(crate) fn parse_or<T: FromStr>(raw: &str, fallback: T) -> T {
    raw.parse().unwrap_or_else(|_| {
        tracing::warn!("Unknown stored value '{}'", raw);
        fallback
    })
}
