//! Conversion between HubSpot property lists and flat property hashes.
//!
//! # Design
//! HubSpot sends and accepts attributes as a list of `{name, value}` records.
//! In memory every resource keeps them as a flat, ordered `name -> value`
//! map. Writes re-serialize that map with an identity key chosen per
//! resource: contacts use `property`, companies, deals and email
//! properties use `name`.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat in-memory form: attribute name to scalar (or null) value.
pub type PropertyHash = IndexMap<String, Value>;

/// Identity key used by contact writes.
pub const DEFAULT_IDENTITY_KEY: &str = "property";

/// One attribute in wire form.
///
/// Serializes as `{<identity_key>: name, "value": value}` plus whichever of
/// the history metadata fields are present. Deserializes from a record
/// carrying the name under either `name` or `property`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub identity_key: String,
    pub name: String,
    pub value: Value,
    pub timestamp: Option<i64>,
    pub source: Option<String>,
}

impl PropertyRecord {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::keyed(DEFAULT_IDENTITY_KEY, name, value)
    }

    pub fn keyed(identity_key: &str, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            identity_key: identity_key.to_string(),
            name: name.into(),
            value: value.into(),
            timestamp: None,
            source: None,
        }
    }
}

impl Serialize for PropertyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.timestamp.is_some()) + usize::from(self.source.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(&self.identity_key, &self.name)?;
        map.serialize_entry("value", &self.value)?;
        if let Some(timestamp) = self.timestamp {
            map.serialize_entry("timestamp", &timestamp)?;
        }
        if let Some(source) = &self.source {
            map.serialize_entry("source", source)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PropertyRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::deserialize(deserializer)?;
        let (identity_key, name) = ["name", DEFAULT_IDENTITY_KEY]
            .into_iter()
            .find_map(|key| match fields.remove(key) {
                Some(Value::String(name)) => Some((key, name)),
                _ => None,
            })
            .ok_or_else(|| de::Error::custom(MissingName))?;

        Ok(Self {
            identity_key: identity_key.to_string(),
            name,
            value: fields.remove("value").unwrap_or(Value::Null),
            timestamp: fields.get("timestamp").and_then(Value::as_i64),
            source: fields.get("source").and_then(Value::as_str).map(str::to_string),
        })
    }
}

struct MissingName;

impl fmt::Display for MissingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("property record has neither `name` nor `property`")
    }
}

/// Flatten wire records into a hash. Later duplicates overwrite earlier
/// values but keep the position of the first occurrence.
pub fn to_hash<'a>(records: impl IntoIterator<Item = &'a PropertyRecord>) -> PropertyHash {
    let mut hash = PropertyHash::new();
    for record in records {
        hash.insert(record.name.clone(), record.value.clone());
    }
    hash
}

/// Expand a hash into wire records, one per entry, in iteration order.
pub fn to_records(hash: &PropertyHash, identity_key: &str) -> Vec<PropertyRecord> {
    hash.iter()
        .map(|(name, value)| PropertyRecord::keyed(identity_key, name.clone(), value.clone()))
        .collect()
}

/// Read the `properties` member of a response body into a hash.
///
/// Accepts `null` or a missing member (empty hash), a list of records, or the
/// object form `{name: {"value": .., "versions": [..]}}` returned by the
/// contact, company and deal endpoints. Malformed entries are skipped.
pub fn properties_from_value(value: Option<&Value>) -> PropertyHash {
    match value {
        Some(Value::Array(items)) => {
            let records: Vec<PropertyRecord> = items
                .iter()
                .filter_map(|item| match PropertyRecord::deserialize(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping malformed property record");
                        None
                    }
                })
                .collect();
            to_hash(&records)
        }
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(name, entry)| {
                let value = match entry {
                    Value::Object(inner) => inner.get("value").cloned().unwrap_or(Value::Null),
                    scalar => scalar.clone(),
                };
                (name.clone(), value)
            })
            .collect(),
        _ => PropertyHash::new(),
    }
}

/// Build a hash from string-keyed pairs.
pub fn hash_from<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> PropertyHash
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
