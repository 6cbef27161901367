//! Partial-field upserts keyed on `(metric_date, time_slot)`.
//!
//! A field missing from the patch is left untouched, an explicit `null`
//! clears it and a number sets it. Field names are the closed
//! [`MetricField`] set; anything else fails to deserialize.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::error::{BoardError, BoardResult};
use crate::types::{deserialize_metric_date, MetricField, SnapshotRow, TimeSlot};

/// What an upsert does to a single field that it mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Explicit null: the stored value is cleared.
    Clear,
    /// The stored value is overwritten.
    Set(i64),
}

impl FieldUpdate {
    /// Returns the value the field holds after the update.
    pub fn value(&self) -> Option<i64> {
        match self {
            FieldUpdate::Clear => None,
            FieldUpdate::Set(v) => Some(*v),
        }
    }
}

impl Serialize for FieldUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldUpdate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<i64>::deserialize(deserializer)? {
            Some(v) => FieldUpdate::Set(v),
            None => FieldUpdate::Clear,
        })
    }
}

/// An idempotent write of some fields of one snapshot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotUpsert {
    #[serde(deserialize_with = "deserialize_metric_date")]
    pub metric_date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(flatten)]
    pub fields: BTreeMap<MetricField, FieldUpdate>,
}

impl SnapshotUpsert {
    /// Creates an upsert that touches no field.
    pub fn new(metric_date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self {
            metric_date,
            time_slot,
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field.
    pub fn set(mut self, field: MetricField, value: i64) -> Self {
        self.fields.insert(field, FieldUpdate::Set(value));
        self
    }

    /// Clears a field.
    pub fn clear(mut self, field: MetricField) -> Self {
        self.fields.insert(field, FieldUpdate::Clear);
        self
    }

    /// Returns the storage key this upsert targets.
    pub fn key(&self) -> (NaiveDate, TimeSlot) {
        (self.metric_date, self.time_slot)
    }

    /// Rejects negative counts; upstream figures may be signed.
    pub fn validate(&self) -> BoardResult<()> {
        for (field, update) in &self.fields {
            if let FieldUpdate::Set(v) = update {
                if *v < 0 && !field.allows_negative() {
                    return Err(BoardError::invalid_field(
                        field.as_str(),
                        format!("must be >= 0, got {v}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Applies the mentioned fields to an existing row.
    pub fn apply_to(&self, row: &mut SnapshotRow, collected_at: DateTime<Utc>) {
        for (field, update) in &self.fields {
            row.set(*field, update.value());
        }
        row.collected_at = collected_at;
    }

    /// Builds the row this upsert produces when no row exists yet.
    pub fn to_row(&self, collected_at: DateTime<Utc>) -> SnapshotRow {
        let mut row = SnapshotRow::new(self.metric_date, self.time_slot, collected_at);
        self.apply_to(&mut row, collected_at);
        row
    }
}
