//! Process-local gateway used by tests and throwaway sessions.

use super::{GatewayError, GatewayResult, PersistenceGateway};
use std::collections::HashMap;

/// In-memory gateway with an optional write-failure switch.
#[derive(Debug, Default, Clone)]
pub struct MemoryGateway {
    entries: HashMap<String, String>,
    reject_writes: bool,
    write_count: usize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut gateway = Self::new();
        gateway.entries.insert(key.into(), value.into());
        gateway
    }

    /// Makes subsequent `set` calls fail, emulating a full storage quota.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl PersistenceGateway for MemoryGateway {
    fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GatewayResult<()> {
        if self.reject_writes {
            return Err(GatewayError::WriteRejected("quota exceeded".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.write_count += 1;
        Ok(())
    }
}
