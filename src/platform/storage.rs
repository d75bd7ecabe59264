//! Key/value persistence
//!
//! LocalStorage on wasm32. Native builds have nowhere to persist to, so reads
//! find nothing and writes are dropped.

use crate::error::Result;

#[cfg(target_arch = "wasm32")]
mod backend {
    use crate::error::{GameError, Result};

    fn local_storage() -> Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Storage {
                reason: "LocalStorage unavailable".to_string(),
            })
    }

    pub fn get(key: &str) -> Result<Option<String>> {
        local_storage()?
            .get_item(key)
            .map_err(|e| GameError::Storage {
                reason: format!("read {key}: {e:?}"),
            })
    }

    pub fn set(key: &str, value: &str) -> Result<()> {
        local_storage()?
            .set_item(key, value)
            .map_err(|e| GameError::Storage {
                reason: format!("write {key}: {e:?}"),
            })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use crate::error::Result;

    pub fn get(_key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    pub fn set(_key: &str, _value: &str) -> Result<()> {
        Ok(())
    }
}

/// Raw string stored under `key`
pub fn get_string(key: &str) -> Result<Option<String>> {
    backend::get(key)
}

pub fn set_string(key: &str, value: &str) -> Result<()> {
    backend::set(key, value)
}
