//! Redis-backed session store
//!
//! Every namespace of a session maps to one Redis hash whose fields hold
//! JSON-encoded values. The session id is assigned by the surrounding web
//! layer and only used to build keys.

use crate::errors::SessionError;
use crate::store::SessionStore;
use config::SessionConfig;
use redis::{Client, Commands, Connection};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct RedisSessionStore {
    client: Arc<Client>,
    config: Arc<SessionConfig>,
    session_id: String,
    connection: Mutex<Option<Connection>>,
}

impl Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = match self.connection.try_lock() {
            Ok(conn) => {
                if conn.is_some() {
                    "connected"
                } else {
                    "no_connection"
                }
            }
            Err(_) => "lock_error",
        };

        f.debug_struct("RedisSessionStore")
            .field("config", &self.config)
            .field("session_id", &self.session_id)
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisSessionStore {
    /// Create a store bound to one session
    pub fn new(config: SessionConfig, session_id: &str) -> Result<Self, SessionError> {
        let client = Client::open(config.redis_url.as_str())?;

        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
            session_id: session_id.to_string(),
            connection: Mutex::new(None),
        })
    }

    /// Same Redis client and config, different session
    pub fn for_session(&self, session_id: &str) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: Arc::clone(&self.config),
            session_id: session_id.to_string(),
            connection: Mutex::new(None),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Generate the hash key of a session namespace
    fn build_namespace_key(&self, namespace: &str) -> String {
        format!(
            "{}:session:{}:{}",
            self.config.key_prefix, self.session_id, namespace
        )
    }

    /// Get or create the Redis connection
    fn connection(&self) -> Result<MutexGuard<'_, Option<Connection>>, SessionError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|e| SessionError::Lock(e.to_string()))?;

        if guard.is_none() {
            tracing::debug!(session = %self.session_id, "opening redis session connection");
            *guard = Some(self.client.get_connection()?);
        }

        Ok(guard)
    }

    fn with_connection<R>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut guard = self.connection()?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| SessionError::General("Failed to get redis connection".into()))?;
        op(conn)
    }

    fn touch(&self, conn: &mut Connection, key: &str) -> Result<(), SessionError> {
        if self.config.ttl_seconds > 0 {
            let _: () = conn.expire(key, self.config.ttl_seconds as i64)?;
        }
        Ok(())
    }
}

impl SessionStore for RedisSessionStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, SessionError> {
        let hash_key = self.build_namespace_key(namespace);
        self.with_connection(|conn| {
            let raw: Option<String> = conn.hget(&hash_key, key)?;
            match raw {
                Some(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
                None => Ok(None),
            }
        })
    }

    fn set(&self, namespace: &str, key: &str, value: &Value) -> Result<(), SessionError> {
        let hash_key = self.build_namespace_key(namespace);
        let json_str = serde_json::to_string(value)?;
        self.with_connection(|conn| {
            let _: () = conn.hset(&hash_key, key, json_str)?;
            self.touch(conn, &hash_key)
        })
    }

    fn set_many(&self, namespace: &str, entries: &Map<String, Value>) -> Result<(), SessionError> {
        if entries.is_empty() {
            return Ok(());
        }

        let hash_key = self.build_namespace_key(namespace);
        let items = entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), serde_json::to_string(value)?)))
            .collect::<Result<Vec<(String, String)>, SessionError>>()?;

        self.with_connection(|conn| {
            let _: () = conn.hset_multiple(&hash_key, &items)?;
            self.touch(conn, &hash_key)
        })
    }

    fn all(&self, namespace: &str) -> Result<Map<String, Value>, SessionError> {
        let hash_key = self.build_namespace_key(namespace);
        self.with_connection(|conn| {
            let raw: HashMap<String, String> = conn.hgetall(&hash_key)?;
            let mut values = Map::new();
            for (key, json_str) in raw {
                values.insert(key, serde_json::from_str(&json_str)?);
            }
            Ok(values)
        })
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool, SessionError> {
        let hash_key = self.build_namespace_key(namespace);
        self.with_connection(|conn| {
            let removed: i32 = conn.hdel(&hash_key, key)?;
            Ok(removed > 0)
        })
    }

    fn destroy(&self, namespace: &str) -> Result<(), SessionError> {
        let hash_key = self.build_namespace_key(namespace);
        self.with_connection(|conn| {
            let _: () = conn.del(&hash_key)?;
            Ok(())
        })
    }
}
