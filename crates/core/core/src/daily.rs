//! Best-available daily values and morning/evening deltas.
//!
//! Two fallback policies coexist and each daily field is bound to exactly
//! one of them at the type level, so a caller cannot mix them:
//!
//! - **Totals**: `latest`, then `evening`, then nothing. Running totals were
//!   collected twice a day before hourly collection started, and history
//!   still has to render.
//! - **Latest-only**: upstream revenue and subscription figures only ever
//!   live in `latest`. Falling back to the timed slots would blend in
//!   unrelated data.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BoardError, BoardResult};
use crate::reconcile::DayRecord;
use crate::types::{FieldKind, MetricField};

/// The rule for deriving one value per day from several slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    Totals,
    LatestOnly,
}

/// A metric field that has a daily value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "MetricField", try_from = "MetricField")]
pub struct DailyField(MetricField);

impl DailyField {
    pub const TOTAL_CALLS: DailyField = DailyField(MetricField::TotalCalls);
    pub const CALLS_ANSWERED: DailyField = DailyField(MetricField::CallsAnswered);
    pub const CALLS_MISSED: DailyField = DailyField(MetricField::CallsMissed);
    pub const TOTAL_CHATBOT_CHATS: DailyField = DailyField(MetricField::TotalChatbotChats);
    pub const TOTAL_EMAILS: DailyField = DailyField(MetricField::TotalEmails);
    pub const TOTAL_WA_MESSAGES: DailyField = DailyField(MetricField::TotalWaMessages);
    pub const REVENUE_MTD: DailyField = DailyField(MetricField::RevenueMtd);
    pub const REVENUE_DAILY: DailyField = DailyField(MetricField::RevenueDaily);
    pub const SUBSCRIPTIONS_ACTIVE: DailyField = DailyField(MetricField::SubscriptionsActive);
    pub const SUBSCRIPTIONS_NEW: DailyField = DailyField(MetricField::SubscriptionsNew);

    /// Running totals read with the totals policy.
    pub const TOTALS: [DailyField; 6] = [
        Self::TOTAL_CALLS,
        Self::CALLS_ANSWERED,
        Self::CALLS_MISSED,
        Self::TOTAL_CHATBOT_CHATS,
        Self::TOTAL_EMAILS,
        Self::TOTAL_WA_MESSAGES,
    ];

    /// The underlying metric field.
    pub fn field(&self) -> MetricField {
        self.0
    }

    /// The policy this field is read with.
    pub fn policy(&self) -> FallbackPolicy {
        match self.0.kind() {
            FieldKind::Upstream => FallbackPolicy::LatestOnly,
            _ => FallbackPolicy::Totals,
        }
    }
}

impl TryFrom<MetricField> for DailyField {
    type Error = BoardError;

    fn try_from(field: MetricField) -> BoardResult<Self> {
        match field.kind() {
            FieldKind::Snapshot => Err(BoardError::NoDailyPolicy {
                field: field.as_str().to_string(),
            }),
            FieldKind::Total | FieldKind::Upstream => Ok(DailyField(field)),
        }
    }
}

impl From<DailyField> for MetricField {
    fn from(field: DailyField) -> Self {
        field.0
    }
}

impl fmt::Display for DailyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The day's best available value for a field, or `None`.
pub fn daily_value(day: &DayRecord, field: DailyField) -> Option<i64> {
    let metric = field.field();
    let latest = day.latest.as_ref().and_then(|row| row.get(metric));
    match field.policy() {
        FallbackPolicy::Totals => {
            latest.or_else(|| day.evening.as_ref().and_then(|row| row.get(metric)))
        }
        FallbackPolicy::LatestOnly => latest,
    }
}

/// Direction of a snapshot count between the morning and evening slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTrend {
    /// Fewer open items in the evening.
    Improved,
    /// More open items in the evening.
    Worsened,
    Unchanged,
}

/// Morning and evening readings of a snapshot field on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotDelta {
    pub morning: Option<i64>,
    pub evening: Option<i64>,
}

impl SlotDelta {
    /// Reads the two timed slots of a day.
    pub fn of(day: &DayRecord, field: MetricField) -> Self {
        Self {
            morning: day.morning.as_ref().and_then(|row| row.get(field)),
            evening: day.evening.as_ref().and_then(|row| row.get(field)),
        }
    }

    /// `evening - morning` when both readings exist.
    pub fn diff(&self) -> Option<i64> {
        Some(self.evening? - self.morning?)
    }

    /// The direction of the change when both readings exist.
    pub fn trend(&self) -> Option<DeltaTrend> {
        self.diff().map(|d| match d {
            d if d < 0 => DeltaTrend::Improved,
            d if d > 0 => DeltaTrend::Worsened,
            _ => DeltaTrend::Unchanged,
        })
    }

    /// Signed label such as `+3` or `-2`; empty when zero or incomplete.
    pub fn label(&self) -> String {
        match self.diff() {
            Some(d) if d > 0 => format!("+{d}"),
            Some(d) if d < 0 => d.to_string(),
            _ => String::new(),
        }
    }
}
