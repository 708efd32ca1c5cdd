//! Typed wrappers over the ATSD REST endpoints.
//!
//! Every service borrows a [`Transport`](crate::transport::Transport) and
//! issues exactly one request per call. Lookups by name answer `Ok(None)` for
//! a 404 reply; every other server error is returned as is.

mod alerts;
mod entities;
mod entity_groups;
mod messages;
mod metrics;
mod properties;
mod series;

pub use alerts::AlertsService;
pub use entities::EntitiesService;
pub use entity_groups::EntityGroupsService;
pub use messages::MessageService;
pub use metrics::MetricsService;
pub use properties::PropertiesService;
pub use series::SeriesService;

use serde_json::{Value, json};

use crate::codec::{Model, serialize_all};
use crate::error::{Error, Result};

/// Rejects empty names before they reach a URL.
pub(crate) fn check_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::InvalidInput("name is empty".to_string()));
    }
    Ok(name)
}

/// Name of a model about to be sent, after its body has been serialized.
pub(crate) fn model_name(name: &Option<String>) -> Result<&str> {
    check_name(name.as_deref().unwrap_or_default())
}

pub(crate) fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// `{"queries": [...]}` envelope used by the query endpoints.
pub(crate) fn queries_body<M: Model>(queries: &[M]) -> Result<Value> {
    Ok(json!({ "queries": serialize_all(queries)? }))
}

/// Takes `key` out of a reply object.
pub(crate) fn take_field(reply: Value, key: &str) -> Result<Value> {
    match reply {
        Value::Object(mut map) => map
            .remove(key)
            .ok_or_else(|| Error::UnexpectedResponse(format!("reply has no `{}` field", key))),
        other => Err(Error::UnexpectedResponse(format!(
            "expected an object with `{}`, got {}",
            key,
            crate::error::json_kind(&other)
        ))),
    }
}

/// Decodes a plain JSON reply that is not a model.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    reply: Value,
    type_name: &'static str,
) -> Result<T> {
    serde_json::from_value(reply).map_err(|source| Error::Decode { type_name, source })
}

/// A JSON `null` reply as an empty list.
pub(crate) fn or_empty_list(reply: Value) -> Value {
    match reply {
        Value::Null => Value::Array(Vec::new()),
        other => other,
    }
}
