//! Core GridQuery functionality
//!
//! This module contains the `GridQuery` coordinator. It owns the database
//! pool, the session store configuration and the named request profiles,
//! and builds rows requests and executors from them.

use entity_query::PgExecutor;
use rows_request::RowsRequest;
use serde_json::{Map, Value};
use session_store::{RedisSessionStore, SessionStore};
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::GridQueryError;
use crate::{debug_log, trace_log};
use config::{AppConfig, DatabaseConfig, RequestConfig, SessionConfig};

/// Main GridQuery coordinator
#[derive(Debug, Default)]
pub struct GridQuery {
    pool: Option<PgPool>,
    session_config: Option<SessionConfig>,
    profiles: BTreeMap<String, RequestConfig>,
}

impl GridQuery {
    /// Coordinator without database, sessions or profiles
    pub fn new() -> Self {
        Self::default()
    }

    /// Take session settings and request profiles from the configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            pool: None,
            session_config: config.session.clone(),
            profiles: config.requests.clone(),
        }
    }

    /// Like `from_config`, then connect to the configured database
    pub async fn connect(config: &AppConfig) -> Result<Self, GridQueryError> {
        let pool = Self::connect_pool(&config.database).await?;
        Ok(Self::from_config(config).with_pool(pool))
    }

    /// Create a connection pool for the database section
    pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, GridQueryError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        debug_log!(host = %config.host, database = %config.database, "connecting database pool");
        Ok(pool_options.connect(&connection_string).await?)
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = Some(config);
        self
    }

    /// Get database pool reference
    pub fn pool(&self) -> Result<&PgPool, GridQueryError> {
        self.pool.as_ref().ok_or(GridQueryError::DatabaseNotConnected)
    }

    /// Executor running listing queries on the pool, mapping rows to `T`
    pub fn executor<T>(&self) -> Result<PgExecutor<T>, GridQueryError> {
        Ok(PgExecutor::new(self.pool()?.clone()))
    }

    /// Register a request profile with a given name
    pub fn register_profile(
        &mut self,
        name: &str,
        config: RequestConfig,
    ) -> Result<(), GridQueryError> {
        if self.profiles.contains_key(name) {
            return Err(GridQueryError::ProfileAlreadyRegistered(name.to_string()));
        }

        self.profiles.insert(name.to_string(), config);
        Ok(())
    }

    /// Get a registered profile by name
    pub fn profile(&self, name: &str) -> Result<&RequestConfig, GridQueryError> {
        self.profiles
            .get(name)
            .ok_or_else(|| GridQueryError::ProfileNotFound(name.to_string()))
    }

    /// Remove a profile by name
    pub fn unregister_profile(&mut self, name: &str) -> Result<RequestConfig, GridQueryError> {
        self.profiles
            .remove(name)
            .ok_or_else(|| GridQueryError::ProfileNotFound(name.to_string()))
    }

    /// List all registered profile names
    pub fn list_profiles(&self) -> Vec<&String> {
        self.profiles.keys().collect()
    }

    /// Redis session store for one user session
    pub fn session_store(&self, session_id: &str) -> Result<Arc<dyn SessionStore>, GridQueryError> {
        let config = self
            .session_config
            .clone()
            .ok_or(GridQueryError::SessionNotConfigured)?;
        Ok(Arc::new(RedisSessionStore::new(config, session_id)?))
    }

    /// Build a request for `profile`, loading stored state from `sessions`
    pub fn request(
        &self,
        profile: &str,
        sessions: Option<Arc<dyn SessionStore>>,
    ) -> Result<RowsRequest, GridQueryError> {
        let config = self.profile(profile)?.clone();
        trace_log!(profile, adapter = config.storage.adapter_name(), "building rows request");
        Ok(RowsRequest::from_config(config, sessions)?)
    }

    /// Build a request for `profile` bound to a Redis-backed session
    ///
    /// Profiles that do not use session storage never touch Redis.
    pub fn request_for_session(
        &self,
        profile: &str,
        session_id: &str,
    ) -> Result<RowsRequest, GridQueryError> {
        let sessions = if self.profile(profile)?.storage.is_session() {
            Some(self.session_store(session_id)?)
        } else {
            None
        };
        self.request(profile, sessions)
    }

    /// Build a request for `profile` and apply generic-protocol input
    pub fn request_from_input(
        &self,
        profile: &str,
        sessions: Option<Arc<dyn SessionStore>>,
        input: Map<String, Value>,
    ) -> Result<RowsRequest, GridQueryError> {
        let mut request = self.request(profile, sessions)?;
        request.set_from_array(input)?;
        Ok(request)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), GridQueryError> {
        sqlx::query("SELECT 1").fetch_one(self.pool()?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::StorageConfig;
    use session_store::MemorySessionStore;
    use serde_json::json;

    #[test]
    fn test_profile_registry() {
        let mut grid = GridQuery::new();
        grid.register_profile("users", RequestConfig::default()).unwrap();

        assert!(matches!(
            grid.register_profile("users", RequestConfig::default()),
            Err(GridQueryError::ProfileAlreadyRegistered(_))
        ));
        assert_eq!(grid.list_profiles(), vec!["users"]);

        grid.unregister_profile("users").unwrap();
        assert!(matches!(
            grid.profile("users"),
            Err(GridQueryError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_request_uses_profile_defaults() {
        let mut grid = GridQuery::new();
        grid.register_profile(
            "articles",
            RequestConfig::default().with_default("length", json!(50)),
        )
        .unwrap();

        let request = grid.request("articles", None).unwrap();
        assert_eq!(request.pagination().per_page(), 50);
    }

    #[test]
    fn test_session_profile_needs_a_store() {
        let mut grid = GridQuery::new();
        grid.register_profile(
            "articles",
            RequestConfig::default().with_storage(StorageConfig::session("Articles")),
        )
        .unwrap();

        assert!(matches!(
            grid.request("articles", None),
            Err(GridQueryError::Request(_))
        ));
        assert!(matches!(
            grid.request_for_session("articles", "abc"),
            Err(GridQueryError::SessionNotConfigured)
        ));

        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        assert!(grid.request("articles", Some(store)).is_ok());
    }

    #[test]
    fn test_no_database() {
        let grid = GridQuery::new();
        assert!(matches!(grid.pool(), Err(GridQueryError::DatabaseNotConnected)));
        assert!(grid.executor::<(i64,)>().is_err());
    }

    #[test]
    fn test_black_hole_profile_skips_sessions() {
        let mut grid = GridQuery::new();
        grid.register_profile("plain", RequestConfig::default()).unwrap();

        let request = grid.request_for_session("plain", "abc").unwrap();
        assert_eq!(request.storage().adapter_name(), "black_hole");
    }
}
