//! Declarative annotation parsing: `key=value,key,...` into an ordered option map.
//!
//! The parser knows nothing about which keys mean what; field variants read
//! the keys they care about and ignore the rest.

use crate::error::{FieldConfigError, TagError};
use std::fmt::Display;
use std::str::FromStr;

/// Annotation value that excludes an attribute from the model entirely.
pub const SKIP: &str = "-";

/// Parsed annotation options in declaration order. Bare keys map to an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: Vec<(String, String)>,
}

impl TagMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Parse the value of `key` as `T`. A missing key is `Ok(None)`.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>, FieldConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| FieldConfigError::invalid(key, raw, e.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Parse a raw annotation. Empty (or whitespace-only) input yields an empty map.
pub fn parse_tag(raw: &str) -> Result<TagMap, TagError> {
    let mut map = TagMap::default();
    if raw.trim().is_empty() {
        return Ok(map);
    }
    for (position, token) in raw.split(',').enumerate() {
        let token = token.trim();
        if token.is_empty() {
            return Err(TagError::EmptyToken { position });
        }
        let (key, value) = match token.split_once('=') {
            None => (token, ""),
            Some((key, value)) => {
                if value.contains('=') {
                    return Err(TagError::UnbalancedToken {
                        token: token.to_string(),
                    });
                }
                let (key, value) = (key.trim(), value.trim());
                if key.is_empty() {
                    return Err(TagError::EmptyKey {
                        token: token.to_string(),
                    });
                }
                if value.is_empty() {
                    return Err(TagError::EmptyValue {
                        token: token.to_string(),
                    });
                }
                (key, value)
            }
        };
        if map.contains(key) {
            return Err(TagError::DuplicateKey {
                key: key.to_string(),
            });
        }
        map.entries.push((key.to_string(), value.to_string()));
    }
    Ok(map)
}
