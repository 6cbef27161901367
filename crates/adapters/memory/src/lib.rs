//! # Weekboard Memory Store
//!
//! An in-memory metrics store for Weekboard, primarily intended for
//! testing and local development.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use weekboard_adapter_memory::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let service = MetricsService::new(store, backfill);
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use weekboard_core::error::{BoardError, BoardResult};
use weekboard_core::patch::SnapshotUpsert;
use weekboard_core::traits::MetricsStore;
use weekboard_core::types::{DateSpan, SnapshotRow, TimeSlot};

/// Rows keyed on `(metric_date, time_slot)`; the key order is the read order.
type Rows = Arc<RwLock<BTreeMap<(NaiveDate, TimeSlot), SnapshotRow>>>;

/// In-memory metrics store.
///
/// Data is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Rows,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given rows; later rows replace earlier
    /// ones with the same key.
    pub fn with_rows(rows: impl IntoIterator<Item = SnapshotRow>) -> Self {
        let map = rows.into_iter().map(|row| (row.key(), row)).collect();
        Self {
            rows: Arc::new(RwLock::new(map)),
            unavailable: Arc::default(),
        }
    }

    /// Clears all stored rows.
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }

    /// Returns the number of rows stored.
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Makes every call fail with `StoreUnavailable` until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> BoardResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BoardError::store("memory store is offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricsStore for MemoryStore {
    async fn rows_between(&self, span: DateSpan) -> BoardResult<Vec<SnapshotRow>> {
        self.check_available()?;
        if span.end <= span.start {
            return Ok(Vec::new());
        }
        let rows = self.rows.read().await;
        Ok(rows
            .range((span.start, TimeSlot::Morning)..(span.end, TimeSlot::Morning))
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn data_version(&self) -> BoardResult<Option<DateTime<Utc>>> {
        self.check_available()?;
        let rows = self.rows.read().await;
        Ok(rows.values().map(|row| row.collected_at).max())
    }

    async fn upsert(
        &self,
        patch: &SnapshotUpsert,
        collected_at: DateTime<Utc>,
    ) -> BoardResult<SnapshotRow> {
        self.check_available()?;
        let mut rows = self.rows.write().await;
        let row = match rows.get_mut(&patch.key()) {
            Some(existing) => {
                patch.apply_to(existing, collected_at);
                existing.clone()
            }
            None => {
                let row = patch.to_row(collected_at);
                rows.insert(row.key(), row.clone());
                row
            }
        };
        Ok(row)
    }
}
