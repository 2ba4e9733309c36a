//! Per-resource endpoints layered over the URL builder and property codec.
//!
//! Each submodule owns the path templates of one HubSpot resource, its typed
//! record, and a further `impl HubSpotClient` block with `build_*`/`parse_*`
//! pairs for every operation that resource supports.

pub mod blog;
pub mod company;
pub mod contact;
pub mod contact_list;
pub mod deal;
pub mod email;
pub mod engagement;
pub mod event;
pub mod form;
pub mod property_schema;
pub mod topic;

use serde_json::{Map, Value};

/// Map every element of `body[key]` through `f`. A missing or non-array
/// member yields an empty list.
pub(crate) fn members<T>(body: &Value, key: &str, f: impl Fn(&Value) -> T) -> Vec<T> {
    body.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(f).collect())
        .unwrap_or_default()
}

/// Map every element of a top-level array through `f`.
pub(crate) fn elements<T>(body: &Value, f: impl Fn(&Value) -> T) -> Vec<T> {
    body.as_array()
        .map(|items| items.iter().map(f).collect())
        .unwrap_or_default()
}

pub(crate) fn object(value: &Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

pub(crate) fn i64_list(value: Option<&Value>) -> Vec<i64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default()
}
