//! Session store contract
//!
//! A session store keeps JSON values under `(namespace, key)` pairs for the
//! lifetime of one user session. Namespaces isolate independent consumers
//! sharing a session.

use crate::errors::SessionError;
use serde_json::{Map, Value};
use std::fmt::Debug;

pub trait SessionStore: Send + Sync + Debug {
    /// Read a single value
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, SessionError>;

    /// Write a single value, replacing any previous one
    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<(), SessionError>;

    /// Write several values at once
    fn set_many(&self, namespace: &str, entries: &Map<String, Value>) -> Result<(), SessionError> {
        for (key, value) in entries {
            self.set(namespace, key, value)?;
        }
        Ok(())
    }

    /// Read every value stored in the namespace
    fn all(&self, namespace: &str) -> Result<Map<String, Value>, SessionError>;

    /// Remove a single value, returns whether it existed
    fn remove(&self, namespace: &str, key: &str) -> Result<bool, SessionError>;

    /// Drop the whole namespace
    fn destroy(&self, namespace: &str) -> Result<(), SessionError>;

    /// Check whether a key is set in the namespace
    fn has(&self, namespace: &str, key: &str) -> Result<bool, SessionError> {
        Ok(self.get(namespace, key)?.is_some())
    }
}
