//! Typed parameter mapping consumed by the URL builder.
//!
//! Every value a caller can put in a URL is one of four kinds: a scalar, a
//! point in time, an inclusive time range, or a list of scalars. `Params`
//! keeps them in insertion order, which is also the order they appear in the
//! rendered query string.

use std::fmt;
use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// A single string, integer or boolean value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Scalar::Str(value.clone())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// One parameter value, tagged by how it is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Scalar(Scalar),
    /// Rendered as epoch milliseconds.
    Time(DateTime<Utc>),
    /// Rendered as the same key twice: start, then end.
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Rendered as the key repeated once per element.
    List(Vec<Scalar>),
}

impl ParamValue {
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        ParamValue::Range { start, end }
    }

    pub fn list<T: Into<Scalar>>(items: impl IntoIterator<Item = T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! scalar_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                ParamValue::Scalar(value.into())
            }
        })*
    };
}

scalar_param!(Scalar, &str, String, &String, i64, i32, u32, bool);

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Time(value)
    }
}

impl From<RangeInclusive<DateTime<Utc>>> for ParamValue {
    fn from(value: RangeInclusive<DateTime<Utc>>) -> Self {
        let (start, end) = value.into_inner();
        ParamValue::Range { start, end }
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for ParamValue {
    fn from(value: Vec<T>) -> Self {
        ParamValue::list(value)
    }
}

/// Ordered mapping from parameter name to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: IndexMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert only when the key is absent.
    pub fn insert_default(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.entry(key.into()).or_insert_with(|| value.into());
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.shift_remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Drop every entry whose value is `false`. Used by endpoints where a
    /// `false` value means "do not send this filter".
    pub fn drop_disabled(&mut self) {
        self.entries
            .retain(|_, v| !matches!(v, ParamValue::Scalar(Scalar::Bool(false))));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
