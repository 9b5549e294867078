//! Session store for namespaced request state
//!
//! This crate provides the key/value session contract used to persist
//! rows request state between requests, with in-memory and Redis backends.

pub mod errors;
pub mod memory;
pub mod prelude;
pub mod redis_store;
pub mod store;

// Re-export centralized config
pub use config::SessionConfig;

pub use errors::SessionError;
pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use store::SessionStore;
