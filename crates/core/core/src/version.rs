//! Polling side of the data-version marker.

use chrono::{DateTime, Utc};

/// Tracks the last observed data version and reports when new data lands.
///
/// The first observation only primes the watcher. After that a version
/// signals new data when it is strictly newer than the previous one; `None`
/// (an empty store) sorts before any instant.
#[derive(Debug, Clone, Default)]
pub struct VersionWatcher {
    last: Option<Option<DateTime<Utc>>>,
}

impl VersionWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a polled version; returns true when the caller should refetch.
    pub fn observe(&mut self, version: Option<DateTime<Utc>>) -> bool {
        let changed = match self.last {
            Some(previous) => version > previous,
            None => false,
        };
        if self.last.is_none() || changed {
            self.last = Some(version);
        }
        changed
    }

    /// The newest version seen so far.
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last.flatten()
    }

    /// Returns true once a first version has been observed.
    pub fn is_primed(&self) -> bool {
        self.last.is_some()
    }
}
