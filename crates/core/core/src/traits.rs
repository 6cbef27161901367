//! Core traits for Weekboard.
//!
//! This module defines the two collaborator seams the dashboard depends on:
//! the metrics store and the backfill trigger. Adapters implement them and
//! the service holds them as `Arc<dyn _>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BoardResult;
use crate::patch::SnapshotUpsert;
use crate::types::{BackfillRequest, DateSpan, SnapshotRow};

/// Trait for snapshot storage backends.
///
/// Implementations keep at most one row per `(metric_date, time_slot)`.
#[async_trait]
pub trait MetricsStore: Send + Sync {
    // ==================== Reads ====================

    /// Rows with `span.start <= metric_date < span.end`, ordered by date
    /// ascending then slot tag ascending.
    async fn rows_between(&self, span: DateSpan) -> BoardResult<Vec<SnapshotRow>>;

    /// The most recent `collected_at` across all rows, `None` when empty.
    async fn data_version(&self) -> BoardResult<Option<DateTime<Utc>>>;

    // ==================== Writes ====================

    /// Applies a partial upsert keyed on `(metric_date, time_slot)`.
    ///
    /// Fields missing from the patch are left untouched, cleared fields
    /// become absent, and `collected_at` is stamped. Returns the stored row.
    async fn upsert(
        &self,
        patch: &SnapshotUpsert,
        collected_at: DateTime<Utc>,
    ) -> BoardResult<SnapshotRow>;
}

/// Trait for asking an external collector to fill a missing slot.
///
/// Fire and poll: success means the request was accepted, not that the
/// row exists yet.
#[async_trait]
pub trait BackfillTrigger: Send + Sync {
    /// Requests collection for one `(date, slot)` key.
    async fn trigger(&self, request: &BackfillRequest) -> BoardResult<()>;

    /// Returns false when no collector is configured.
    fn is_configured(&self) -> bool {
        true
    }
}
