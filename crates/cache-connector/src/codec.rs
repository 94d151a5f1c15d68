//! Key and value serializers.
//!
//! Keys are plain strings, optionally namespaced. Values are JSON.

use serde::{de::DeserializeOwned, Serialize};

use common::CacheResult;

/// Serializer pair shared by live and placeholder handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheCodec {
    namespace: Option<String>,
}

impl CacheCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every key with `namespace`. Blank clears the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        self.namespace = (!namespace.trim().is_empty()).then_some(namespace);
        self
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Serialize a key.
    pub fn key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}{}", ns, key),
            None => key.to_string(),
        }
    }

    /// Serialize a value to JSON.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CacheResult<String> {
        Ok(serde_json::to_string(value)?)
    }

    /// Deserialize a JSON value.
    pub fn decode<T: DeserializeOwned>(&self, raw: &str) -> CacheResult<T> {
        Ok(serde_json::from_str(raw)?)
    }
}
