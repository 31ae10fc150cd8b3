//! List results.
//!
//! The API answers list requests either with a bare JSON array or, when
//! `include_totals=true`, with an object that carries pagination metadata next
//! to the items:
//!
//! ```json
//! {"self_service_profiles": [...], "start": 0, "limit": 50, "length": 2, "total": 2}
//! ```
//!
//! [`Page`] accepts both shapes. Item order is the order the server returned.

use crate::resource::ManagedResource;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination metadata shared by every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub length: u64,
    #[serde(default)]
    pub total: u64,
    /// Checkpoint cursor for the next page, when checkpoint pagination is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl ListMeta {
    /// Whether more results are available after this page.
    pub fn has_next(&self) -> bool {
        if self.next.as_deref().is_some_and(|next| !next.is_empty()) {
            return true;
        }
        self.start + self.length < self.total
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub meta: ListMeta,
    pub items: Vec<R>,
}

impl<R> Page<R> {
    pub fn has_next(&self) -> bool {
        self.meta.has_next()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.items.iter()
    }
}

impl<R> Default for Page<R> {
    fn default() -> Self {
        Self {
            meta: ListMeta::default(),
            items: Vec::new(),
        }
    }
}

impl<R> IntoIterator for Page<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<R: ManagedResource> Serialize for Page<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(R::LIST_KEY, &self.items)?;
        map.serialize_entry("start", &self.meta.start)?;
        map.serialize_entry("limit", &self.meta.limit)?;
        map.serialize_entry("length", &self.meta.length)?;
        map.serialize_entry("total", &self.meta.total)?;
        if let Some(next) = &self.meta.next {
            map.serialize_entry("next", next)?;
        }
        map.end()
    }
}

impl<'de, R: ManagedResource> Deserialize<'de> for Page<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => {
                let items: Vec<R> =
                    serde_json::from_value(Value::Array(items)).map_err(de::Error::custom)?;
                let length = items.len() as u64;
                Ok(Page {
                    meta: ListMeta {
                        length,
                        total: length,
                        ..ListMeta::default()
                    },
                    items,
                })
            }
            Value::Object(mut fields) => {
                let items = match fields.remove(R::LIST_KEY) {
                    Some(items) => serde_json::from_value(items).map_err(de::Error::custom)?,
                    None => return Err(de::Error::missing_field(R::LIST_KEY)),
                };
                let meta: ListMeta =
                    serde_json::from_value(Value::Object(fields)).map_err(de::Error::custom)?;
                Ok(Page { meta, items })
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"a list of items or an object with pagination metadata",
            )),
        }
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Bool(b) => de::Unexpected::Bool(*b),
        Value::Number(_) => de::Unexpected::Other("number"),
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}
