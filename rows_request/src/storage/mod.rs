//! Request state storage
//!
//! A storage keeps a request's flattened state between calls. The
//! black hole storage keeps nothing; the session storage writes into one
//! namespace of a `SessionStore`.

mod black_hole;
mod session;

pub use black_hole::BlackHoleStorage;
pub use session::SessionStorage;

use crate::errors::RequestError;
use crate::request::RowsRequest;
use config::{StorageConfig, STORAGE_ADAPTER_BLACK_HOLE, STORAGE_ADAPTER_SESSION};
use session_store::SessionStore;
use std::fmt::Debug;
use std::sync::Arc;

pub trait Storage: Send + Sync + Debug {
    /// Persist the request's flattened state
    fn save(&self, request: &RowsRequest) -> Result<(), RequestError>;

    /// Merge stored state into the request
    fn load(&self, request: &mut RowsRequest) -> Result<(), RequestError>;

    /// Forget everything stored
    fn clear(&self) -> Result<(), RequestError>;

    /// Adapter name as used in configuration
    fn adapter_name(&self) -> &'static str;
}

/// Build the storage named by `config`
pub fn resolve(
    config: &StorageConfig,
    sessions: Option<Arc<dyn SessionStore>>,
) -> Result<Arc<dyn Storage>, RequestError> {
    let adapter = config.adapter_name();
    tracing::debug!(adapter, "resolving rows request storage");

    match adapter {
        STORAGE_ADAPTER_BLACK_HOLE => Ok(Arc::new(BlackHoleStorage)),
        STORAGE_ADAPTER_SESSION => {
            let store =
                sessions.ok_or_else(|| RequestError::MissingSessionStore(adapter.to_string()))?;
            Ok(Arc::new(SessionStorage::new(
                store,
                config.namespace_or_default(),
            )))
        }
        other => Err(RequestError::UnknownStorageAdapter(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_store::MemorySessionStore;

    #[test]
    fn test_resolve_defaults_to_black_hole() {
        let storage = resolve(&StorageConfig::default(), None).unwrap();
        assert_eq!(storage.adapter_name(), STORAGE_ADAPTER_BLACK_HOLE);

        let storage = resolve(&StorageConfig::black_hole(), None).unwrap();
        assert_eq!(storage.adapter_name(), STORAGE_ADAPTER_BLACK_HOLE);
    }

    #[test]
    fn test_resolve_session() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let storage = resolve(&StorageConfig::session("Grid"), Some(store)).unwrap();
        assert_eq!(storage.adapter_name(), STORAGE_ADAPTER_SESSION);
    }

    #[test]
    fn test_resolve_errors() {
        assert!(matches!(
            resolve(&StorageConfig::session("Grid"), None),
            Err(RequestError::MissingSessionStore(_))
        ));

        let unknown = StorageConfig {
            adapter: Some("memcache".into()),
            namespace: None,
        };
        assert!(matches!(
            resolve(&unknown, None),
            Err(RequestError::UnknownStorageAdapter(name)) if name == "memcache"
        ));
    }
}
