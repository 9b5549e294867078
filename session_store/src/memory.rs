//! In-process session store
//!
//! Keeps one session's namespaces in memory. Useful for tests and for
//! single-process deployments where sessions live as long as the server.

use crate::errors::SessionError;
use crate::store::SessionStore;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    namespaces: RwLock<HashMap<String, Map<String, Value>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces currently holding data
    pub fn namespace_count(&self) -> usize {
        self.read().map(|ns| ns.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Map<String, Value>>>, SessionError> {
        self.namespaces
            .read()
            .map_err(|e| SessionError::Lock(e.to_string()))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, Map<String, Value>>>, SessionError> {
        self.namespaces
            .write()
            .map_err(|e| SessionError::Lock(e.to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, SessionError> {
        Ok(self
            .read()?
            .get(namespace)
            .and_then(|values| values.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<(), SessionError> {
        self.write()?
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn set_many(&self, namespace: &str, entries: &Map<String, Value>) -> Result<(), SessionError> {
        let mut namespaces = self.write()?;
        let values = namespaces.entry(namespace.to_string()).or_default();
        for (key, value) in entries {
            values.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn all(&self, namespace: &str) -> Result<Map<String, Value>, SessionError> {
        Ok(self.read()?.get(namespace).cloned().unwrap_or_default())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool, SessionError> {
        Ok(self
            .write()?
            .get_mut(namespace)
            .map(|values| values.remove(key).is_some())
            .unwrap_or(false))
    }

    fn destroy(&self, namespace: &str) -> Result<(), SessionError> {
        self.write()?.remove(namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespaces_are_isolated() {
        let store = MemorySessionStore::new();
        store.set("a", "start", &json!(10)).unwrap();
        store.set("b", "start", &json!(20)).unwrap();

        assert_eq!(store.get("a", "start").unwrap(), Some(json!(10)));
        assert_eq!(store.get("b", "start").unwrap(), Some(json!(20)));
        assert_eq!(store.get("c", "start").unwrap(), None);
    }

    #[test]
    fn test_set_many_and_all() {
        let store = MemorySessionStore::new();
        let mut entries = Map::new();
        entries.insert("start".into(), json!(0));
        entries.insert("order".into(), json!(["name asc"]));
        store.set_many("grid", &entries).unwrap();

        assert_eq!(store.all("grid").unwrap(), entries);
        assert!(store.has("grid", "order").unwrap());
    }

    #[test]
    fn test_remove_and_destroy() {
        let store = MemorySessionStore::new();
        store.set("grid", "start", &json!(5)).unwrap();
        store.set("grid", "length", &json!(50)).unwrap();

        assert!(store.remove("grid", "start").unwrap());
        assert!(!store.remove("grid", "start").unwrap());

        store.destroy("grid").unwrap();
        assert!(store.all("grid").unwrap().is_empty());
        assert_eq!(store.namespace_count(), 0);
    }
}
