//! Core data types for Weekboard.
//!
//! This module defines the persisted `SnapshotRow`, the closed set of slot
//! tags and metric fields, and the date span types every other module
//! works in.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, BoardResult};

/// The collection-time label distinguishing same-day snapshots.
///
/// The variant order matches the ascending string order of the tags, so
/// sorting rows by `(metric_date, time_slot)` matches the store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    /// The 08:00 snapshot.
    #[serde(rename = "08:00")]
    Morning,
    /// The 18:00 snapshot.
    #[serde(rename = "18:00")]
    Evening,
    /// Continuously overwritten most-recent snapshot.
    #[serde(rename = "latest")]
    Latest,
}

impl TimeSlot {
    /// All slot tags in store order.
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Evening, TimeSlot::Latest];

    /// The twice-daily slots that a collector fills at a fixed time.
    pub const TIMED: [TimeSlot; 2] = [TimeSlot::Morning, TimeSlot::Evening];

    /// Returns the wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "08:00",
            TimeSlot::Evening => "18:00",
            TimeSlot::Latest => "latest",
        }
    }

    /// Returns true for the fixed-time slots.
    pub fn is_timed(&self) -> bool {
        !matches!(self, TimeSlot::Latest)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = BoardError;

    fn from_str(s: &str) -> BoardResult<Self> {
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| BoardError::UnknownTimeSlot {
                value: s.to_string(),
            })
    }
}

/// How a metric field is read off the slots of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A point-in-time count (open tickets); compared across slots.
    Snapshot,
    /// A running daily total (calls, chats); the last slot of the day wins.
    Total,
    /// Sourced from a separate upstream system, only ever in `latest`.
    Upstream,
}

/// The closed set of numeric fields a snapshot row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    UnassignedTickets,
    AllOpenTickets,
    WhatsappAllOpen,
    WhatsappWaitingOnUs,
    WaitingOnUs,
    TotalCalls,
    CallsAnswered,
    CallsMissed,
    TotalChatbotChats,
    TotalEmails,
    TotalWaMessages,
    RevenueMtd,
    RevenueDaily,
    SubscriptionsActive,
    SubscriptionsNew,
}

impl MetricField {
    /// Every recognized field, in column order.
    pub const ALL: [MetricField; 15] = [
        MetricField::UnassignedTickets,
        MetricField::AllOpenTickets,
        MetricField::WhatsappAllOpen,
        MetricField::WhatsappWaitingOnUs,
        MetricField::WaitingOnUs,
        MetricField::TotalCalls,
        MetricField::CallsAnswered,
        MetricField::CallsMissed,
        MetricField::TotalChatbotChats,
        MetricField::TotalEmails,
        MetricField::TotalWaMessages,
        MetricField::RevenueMtd,
        MetricField::RevenueDaily,
        MetricField::SubscriptionsActive,
        MetricField::SubscriptionsNew,
    ];

    /// Returns the snake_case column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::UnassignedTickets => "unassigned_tickets",
            MetricField::AllOpenTickets => "all_open_tickets",
            MetricField::WhatsappAllOpen => "whatsapp_all_open",
            MetricField::WhatsappWaitingOnUs => "whatsapp_waiting_on_us",
            MetricField::WaitingOnUs => "waiting_on_us",
            MetricField::TotalCalls => "total_calls",
            MetricField::CallsAnswered => "calls_answered",
            MetricField::CallsMissed => "calls_missed",
            MetricField::TotalChatbotChats => "total_chatbot_chats",
            MetricField::TotalEmails => "total_emails",
            MetricField::TotalWaMessages => "total_wa_messages",
            MetricField::RevenueMtd => "revenue_mtd",
            MetricField::RevenueDaily => "revenue_daily",
            MetricField::SubscriptionsActive => "subscriptions_active",
            MetricField::SubscriptionsNew => "subscriptions_new",
        }
    }

    /// Returns how the field is read off a day's slots.
    pub fn kind(&self) -> FieldKind {
        match self {
            MetricField::UnassignedTickets
            | MetricField::AllOpenTickets
            | MetricField::WhatsappAllOpen
            | MetricField::WhatsappWaitingOnUs
            | MetricField::WaitingOnUs => FieldKind::Snapshot,
            MetricField::TotalCalls
            | MetricField::CallsAnswered
            | MetricField::CallsMissed
            | MetricField::TotalChatbotChats
            | MetricField::TotalEmails
            | MetricField::TotalWaMessages => FieldKind::Total,
            MetricField::RevenueMtd
            | MetricField::RevenueDaily
            | MetricField::SubscriptionsActive
            | MetricField::SubscriptionsNew => FieldKind::Upstream,
        }
    }

    /// Upstream figures are signed (refunds, cancellations); counts are not.
    pub fn allows_negative(&self) -> bool {
        self.kind() == FieldKind::Upstream
    }

    /// Returns all fields of the given kind.
    pub fn of_kind(kind: FieldKind) -> impl Iterator<Item = MetricField> {
        MetricField::ALL.into_iter().filter(move |f| f.kind() == kind)
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricField {
    type Err = BoardError;

    fn from_str(s: &str) -> BoardResult<Self> {
        MetricField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| BoardError::UnknownField {
                value: s.to_string(),
            })
    }
}

/// One persisted metric observation.
///
/// Every numeric field is independently nullable: `None` means "not yet
/// collected", never zero. At most one row exists per
/// `(metric_date, time_slot)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(deserialize_with = "deserialize_metric_date")]
    pub metric_date: NaiveDate,
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub unassigned_tickets: Option<i64>,
    #[serde(default)]
    pub all_open_tickets: Option<i64>,
    #[serde(default)]
    pub whatsapp_all_open: Option<i64>,
    #[serde(default)]
    pub whatsapp_waiting_on_us: Option<i64>,
    #[serde(default)]
    pub waiting_on_us: Option<i64>,
    #[serde(default)]
    pub total_calls: Option<i64>,
    #[serde(default)]
    pub calls_answered: Option<i64>,
    #[serde(default)]
    pub calls_missed: Option<i64>,
    #[serde(default)]
    pub total_chatbot_chats: Option<i64>,
    #[serde(default)]
    pub total_emails: Option<i64>,
    #[serde(default)]
    pub total_wa_messages: Option<i64>,
    /// Month-to-date revenue in minor currency units.
    #[serde(default)]
    pub revenue_mtd: Option<i64>,
    /// Revenue booked on this day in minor currency units.
    #[serde(default)]
    pub revenue_daily: Option<i64>,
    #[serde(default)]
    pub subscriptions_active: Option<i64>,
    #[serde(default)]
    pub subscriptions_new: Option<i64>,
    /// When the row was last written. Display only.
    pub collected_at: DateTime<Utc>,
}

impl SnapshotRow {
    /// Creates an empty row for the given key.
    pub fn new(metric_date: NaiveDate, time_slot: TimeSlot, collected_at: DateTime<Utc>) -> Self {
        Self {
            metric_date,
            time_slot,
            unassigned_tickets: None,
            all_open_tickets: None,
            whatsapp_all_open: None,
            whatsapp_waiting_on_us: None,
            waiting_on_us: None,
            total_calls: None,
            calls_answered: None,
            calls_missed: None,
            total_chatbot_chats: None,
            total_emails: None,
            total_wa_messages: None,
            revenue_mtd: None,
            revenue_daily: None,
            subscriptions_active: None,
            subscriptions_new: None,
            collected_at,
        }
    }

    /// Sets a field, consuming and returning the row.
    pub fn with(mut self, field: MetricField, value: i64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Returns the storage key of this row.
    pub fn key(&self) -> (NaiveDate, TimeSlot) {
        (self.metric_date, self.time_slot)
    }

    /// Reads a field by name.
    pub fn get(&self, field: MetricField) -> Option<i64> {
        match field {
            MetricField::UnassignedTickets => self.unassigned_tickets,
            MetricField::AllOpenTickets => self.all_open_tickets,
            MetricField::WhatsappAllOpen => self.whatsapp_all_open,
            MetricField::WhatsappWaitingOnUs => self.whatsapp_waiting_on_us,
            MetricField::WaitingOnUs => self.waiting_on_us,
            MetricField::TotalCalls => self.total_calls,
            MetricField::CallsAnswered => self.calls_answered,
            MetricField::CallsMissed => self.calls_missed,
            MetricField::TotalChatbotChats => self.total_chatbot_chats,
            MetricField::TotalEmails => self.total_emails,
            MetricField::TotalWaMessages => self.total_wa_messages,
            MetricField::RevenueMtd => self.revenue_mtd,
            MetricField::RevenueDaily => self.revenue_daily,
            MetricField::SubscriptionsActive => self.subscriptions_active,
            MetricField::SubscriptionsNew => self.subscriptions_new,
        }
    }

    /// Writes a field by name; `None` clears it.
    pub fn set(&mut self, field: MetricField, value: Option<i64>) {
        let slot = match field {
            MetricField::UnassignedTickets => &mut self.unassigned_tickets,
            MetricField::AllOpenTickets => &mut self.all_open_tickets,
            MetricField::WhatsappAllOpen => &mut self.whatsapp_all_open,
            MetricField::WhatsappWaitingOnUs => &mut self.whatsapp_waiting_on_us,
            MetricField::WaitingOnUs => &mut self.waiting_on_us,
            MetricField::TotalCalls => &mut self.total_calls,
            MetricField::CallsAnswered => &mut self.calls_answered,
            MetricField::CallsMissed => &mut self.calls_missed,
            MetricField::TotalChatbotChats => &mut self.total_chatbot_chats,
            MetricField::TotalEmails => &mut self.total_emails,
            MetricField::TotalWaMessages => &mut self.total_wa_messages,
            MetricField::RevenueMtd => &mut self.revenue_mtd,
            MetricField::RevenueDaily => &mut self.revenue_daily,
            MetricField::SubscriptionsActive => &mut self.subscriptions_active,
            MetricField::SubscriptionsNew => &mut self.subscriptions_new,
        };
        *slot = value;
    }

    /// Returns true when no field has been collected yet.
    pub fn is_empty(&self) -> bool {
        MetricField::ALL.into_iter().all(|f| self.get(f).is_none())
    }
}

/// Parses a `YYYY-MM-DD` date, ignoring any `T...` time suffix.
pub fn parse_metric_date(value: &str) -> BoardResult<NaiveDate> {
    let date_part = value.split('T').next().unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| BoardError::invalid_date(value))
}

/// Serde adapter for dates that may arrive with a time component.
pub fn deserialize_metric_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_metric_date(&raw).map_err(serde::de::Error::custom)
}

/// A half-open `[start, end)` range of whole calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Creates a span; `end` is exclusive.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days().max(0)
    }

    /// Returns true when the date falls inside the span.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Iterates every date of the span in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        (0..self.len_days()).map(move |offset| start + Duration::days(offset))
    }

    /// Returns true when both ends of the inclusive range share a month.
    pub fn within_one_month(&self) -> bool {
        let last = self.end - Duration::days(1);
        (self.start.year(), self.start.month()) == (last.year(), last.month())
    }
}

/// A request to collect a missing slot after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackfillRequest {
    #[serde(deserialize_with = "deserialize_metric_date")]
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

impl BackfillRequest {
    /// Creates a new backfill request.
    pub fn new(date: NaiveDate, time_slot: TimeSlot) -> Self {
        Self { date, time_slot }
    }

    /// Only the fixed-time slots can be collected for a past moment.
    pub fn validate(&self) -> BoardResult<()> {
        if !self.time_slot.is_timed() {
            return Err(BoardError::invalid_field(
                "time_slot",
                "only 08:00 and 18:00 can be backfilled",
            ));
        }
        Ok(())
    }
}
