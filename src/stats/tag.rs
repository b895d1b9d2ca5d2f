//! Tag keys and tag maps: the dimensions attached to recorded values.

use crate::error::TagError;
use opentelemetry::KeyValue;
use std::collections::BTreeMap;

/// Maximum length, in bytes, of a tag key or tag value.
pub const MAX_TAG_LEN: usize = 255;

/// Attribute name under which the queue name is recorded.
pub const NAME_ATTRIBUTE: &str = "k8s.client-go.workqueue.name";

/// Dimension carrying the name the queue was given when created.
pub const NAME: TagKey = TagKey(NAME_ATTRIBUTE);

/// A validated tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagKey(&'static str);

impl TagKey {
    /// Create a key, rejecting empty, oversized or non-printable names.
    pub fn new(name: &'static str) -> Result<Self, TagError> {
        if name.is_empty() || !is_valid(name) {
            return Err(TagError::InvalidKey {
                key: name.to_string(),
            });
        }
        Ok(Self(name))
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

fn is_valid(s: &str) -> bool {
    s.len() <= MAX_TAG_LEN && s.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// Set of tags a measurement is recorded under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    tags: BTreeMap<TagKey, String>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(key, value)` upserts.
    ///
    /// Upserts are applied in order. The first invalid value is returned
    /// alongside the map built from every valid upsert, so callers can still
    /// record against it.
    pub fn from_upserts<'a, I>(upserts: I) -> (Self, Option<TagError>)
    where
        I: IntoIterator<Item = (TagKey, &'a str)>,
    {
        let mut map = Self::new();
        let mut first_err = None;
        for (key, value) in upserts {
            if let Err(e) = map.upsert(key, value) {
                first_err.get_or_insert(e);
            }
        }
        (map, first_err)
    }

    /// Insert or replace the value for `key`. Invalid values leave the map
    /// unchanged.
    pub fn upsert(&mut self, key: TagKey, value: &str) -> Result<(), TagError> {
        if !is_valid(value) {
            return Err(TagError::InvalidValue {
                key: key.name().to_string(),
                value: value.to_string(),
            });
        }
        self.tags.insert(key, value.to_string());
        Ok(())
    }

    pub fn value(&self, key: &TagKey) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &str)> {
        self.tags.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Convert to OpenTelemetry attributes.
    pub fn to_attributes(&self) -> Vec<KeyValue> {
        self.tags
            .iter()
            .map(|(k, v)| KeyValue::new(k.name(), v.clone()))
            .collect()
    }
}
