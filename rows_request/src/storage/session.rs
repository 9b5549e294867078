use super::Storage;
use crate::errors::RequestError;
use crate::request::RowsRequest;
use config::STORAGE_ADAPTER_SESSION;
use session_store::SessionStore;
use std::sync::Arc;

/// Storage backed by one namespace of a session
#[derive(Debug, Clone)]
pub struct SessionStorage {
    store: Arc<dyn SessionStore>,
    namespace: String,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn SessionStore>, namespace: &str) -> Self {
        Self {
            store,
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}

impl Storage for SessionStorage {
    fn save(&self, request: &RowsRequest) -> Result<(), RequestError> {
        let data = request.to_array();
        tracing::debug!(namespace = %self.namespace, keys = data.len(), "saving rows request to session");
        self.store.set_many(&self.namespace, &data)?;
        Ok(())
    }

    fn load(&self, request: &mut RowsRequest) -> Result<(), RequestError> {
        let data = self.store.all(&self.namespace)?;
        tracing::debug!(namespace = %self.namespace, keys = data.len(), "loading rows request from session");
        if !data.is_empty() {
            request.set_from_array(data)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), RequestError> {
        tracing::debug!(namespace = %self.namespace, "clearing rows request session state");
        self.store.destroy(&self.namespace)?;
        Ok(())
    }

    fn adapter_name(&self) -> &'static str {
        STORAGE_ADAPTER_SESSION
    }
}
