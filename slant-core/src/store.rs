//! Verdict persistence.
//!
//! Profiles are keyed by article URL and stamped when stored. Only a simple
//! put/get contract is defined; backends decide how to keep the records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use slant_common::{Error, Result};

use crate::pipeline::ArticleProfile;

/// A stored profile with its storage time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    pub profile: ArticleProfile,
    pub stored_at: DateTime<Utc>,
}

/// Key-value store for article profiles.
pub trait VerdictStore: Send + Sync {
    /// Store a profile under its URL, replacing any earlier one.
    fn put(&self, profile: ArticleProfile) -> Result<StoredProfile>;

    /// Fetch the profile stored for a URL.
    fn get(&self, url: &str) -> Result<Option<StoredProfile>>;

    /// Number of stored profiles.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Process-local store backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryVerdictStore {
    records: RwLock<HashMap<String, StoredProfile>>,
}

impl InMemoryVerdictStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> Error {
    Error::Store("lock poisoned".into())
}

impl VerdictStore for InMemoryVerdictStore {
    fn put(&self, profile: ArticleProfile) -> Result<StoredProfile> {
        let record = StoredProfile {
            profile,
            stored_at: Utc::now(),
        };
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let replaced = records
            .insert(record.profile.url.clone(), record.clone())
            .is_some();
        debug!(url = %record.profile.url, replaced, "Stored profile");
        Ok(record)
    }

    fn get(&self, url: &str) -> Result<Option<StoredProfile>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.get(url).cloned())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.read().map_err(|_| poisoned())?.len())
    }
}
