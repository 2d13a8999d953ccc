//! Credential Store — holds the one API key used for completion calls.
//!
//! The key is only ever seeded from configuration or set by the user.
//! It lives for the lifetime of the process.

use std::fmt;

use tokio::sync::RwLock;

/// Fixed name of the stored credential, shared with the environment variable.
pub const CREDENTIAL_NAME: &str = "COMPLETION_API_KEY";

#[derive(Default)]
pub struct CredentialStore {
    value: RwLock<Option<String>>,
}

impl CredentialStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            value: RwLock::new(initial.and_then(normalize)),
        }
    }

    /// Current key, or `None` if unset.
    pub async fn get(&self) -> Option<String> {
        self.value.read().await.clone()
    }

    /// Replaces the key. Returns `false` (and leaves the store untouched) when
    /// `value` is blank.
    pub async fn set(&self, value: &str) -> bool {
        match normalize(value.to_string()) {
            Some(v) => {
                *self.value.write().await = Some(v);
                true
            }
            None => false,
        }
    }

    pub async fn clear(&self) {
        *self.value.write().await = None;
    }

    pub async fn is_configured(&self) -> bool {
        self.value.read().await.is_some()
    }
}

// Never print the key.
impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("name", &CREDENTIAL_NAME)
            .finish_non_exhaustive()
    }
}

fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
