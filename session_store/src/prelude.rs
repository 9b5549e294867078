//! Convenience re-exports for common session-store usage

pub use crate::errors::SessionError;
pub use crate::memory::MemorySessionStore;
pub use crate::redis_store::RedisSessionStore;
pub use crate::store::SessionStore;

// Re-export centralized config
pub use config::SessionConfig;
