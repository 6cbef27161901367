//! Chart series over a multi-week span.

use chrono::NaiveDate;
use serde::Serialize;

use crate::daily::{daily_value, DailyField, SlotDelta};
use crate::reconcile::{build_span_days, DayRecord};
use crate::types::{DateSpan, MetricField, SnapshotRow};

/// Y-axis padding ratio for the all-open chart.
pub const ALL_OPEN_PAD_RATIO: f64 = 0.15;
/// Y-axis padding ratio for the subscriptions chart.
pub const SUBSCRIPTIONS_PAD_RATIO: f64 = 0.2;
/// Smallest y-axis padding.
pub const MIN_AXIS_PAD: i64 = 5;

/// Morning and evening all-open counts for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllOpenPoint {
    pub date: NaiveDate,
    pub morning: Option<i64>,
    pub evening: Option<i64>,
}

/// Evening waiting-on-us counts for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingOnUsPoint {
    pub date: NaiveDate,
    pub tickets: Option<i64>,
    pub whatsapp: Option<i64>,
}

/// Daily traffic per channel, read with the totals policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub calls: Option<i64>,
    pub chatbot: Option<i64>,
    pub emails: Option<i64>,
    pub wa_messages: Option<i64>,
}

/// Tickets resolved during the day (`morning - evening` all-open).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPoint {
    pub date: NaiveDate,
    pub resolved: Option<i64>,
}

/// Active subscriptions on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionPoint {
    pub date: NaiveDate,
    pub active: i64,
}

/// A `[min, max]` y-axis range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AxisDomain {
    pub min: i64,
    pub max: i64,
}

/// All chart series for a span, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub span: DateSpan,
    pub all_open: Vec<AllOpenPoint>,
    pub all_open_domain: AxisDomain,
    pub waiting_on_us: Vec<WaitingOnUsPoint>,
    pub daily_volume: Vec<VolumePoint>,
    pub daily_resolution: Vec<ResolutionPoint>,
    pub subscriptions: Vec<SubscriptionPoint>,
    pub subscriptions_domain: AxisDomain,
}

/// A y-axis range that zooms in on the data.
///
/// Pads by `max(ceil((max - min) * ratio), min_pad)` on both sides and never
/// goes below zero. Without values the range is `[0, 100]`.
pub fn padded_domain(values: &[i64], ratio: f64, min_pad: i64) -> AxisDomain {
    let (Some(min), Some(max)) = (values.iter().min(), values.iter().max()) else {
        return AxisDomain { min: 0, max: 100 };
    };
    // Float-to-int `as` saturates, so a huge spread clamps to i64::MAX.
    let pad = ((max.abs_diff(*min) as f64 * ratio).ceil() as i64).max(min_pad);
    AxisDomain {
        min: min.saturating_sub(pad).max(0),
        max: max.saturating_add(pad),
    }
}

/// Builds every series from the rows of `span`.
///
/// Only days that are not in the future and have at least one row produce a
/// point, so charts never show empty trailing days.
pub fn build_trends(span: DateSpan, rows: &[SnapshotRow], today: NaiveDate) -> TrendReport {
    let days: Vec<DayRecord> = build_span_days(span, rows, today)
        .into_iter()
        .filter(|day| !day.is_future && day.has_data())
        .collect();

    let all_open: Vec<AllOpenPoint> = days
        .iter()
        .filter(|day| day.morning.is_some() || day.evening.is_some())
        .map(|day| {
            let delta = SlotDelta::of(day, MetricField::AllOpenTickets);
            AllOpenPoint {
                date: day.date,
                morning: delta.morning,
                evening: delta.evening,
            }
        })
        .collect();
    let all_open_values: Vec<i64> = all_open
        .iter()
        .flat_map(|p| [p.morning, p.evening])
        .flatten()
        .collect();

    let waiting_on_us = days
        .iter()
        .filter_map(|day| {
            let evening = day.evening.as_ref()?;
            Some(WaitingOnUsPoint {
                date: day.date,
                tickets: evening.get(MetricField::WaitingOnUs),
                whatsapp: evening.get(MetricField::WhatsappWaitingOnUs),
            })
        })
        .collect();

    let daily_volume = days
        .iter()
        .map(|day| VolumePoint {
            date: day.date,
            calls: daily_value(day, DailyField::TOTAL_CALLS),
            chatbot: daily_value(day, DailyField::TOTAL_CHATBOT_CHATS),
            emails: daily_value(day, DailyField::TOTAL_EMAILS),
            wa_messages: daily_value(day, DailyField::TOTAL_WA_MESSAGES),
        })
        .filter(|p| {
            p.calls.is_some() || p.chatbot.is_some() || p.emails.is_some() || p.wa_messages.is_some()
        })
        .collect();

    let daily_resolution = days
        .iter()
        .filter(|day| day.morning.is_some() || day.evening.is_some())
        .map(|day| {
            let delta = SlotDelta::of(day, MetricField::AllOpenTickets);
            ResolutionPoint {
                date: day.date,
                resolved: delta.diff().map(|d| -d),
            }
        })
        .collect();

    let subscriptions: Vec<SubscriptionPoint> = days
        .iter()
        .filter_map(|day| {
            daily_value(day, DailyField::SUBSCRIPTIONS_ACTIVE).map(|active| SubscriptionPoint {
                date: day.date,
                active,
            })
        })
        .collect();
    let subscription_values: Vec<i64> = subscriptions.iter().map(|p| p.active).collect();

    TrendReport {
        span,
        all_open_domain: padded_domain(&all_open_values, ALL_OPEN_PAD_RATIO, MIN_AXIS_PAD),
        all_open,
        waiting_on_us,
        daily_volume,
        daily_resolution,
        subscriptions_domain: padded_domain(
            &subscription_values,
            SUBSCRIPTIONS_PAD_RATIO,
            MIN_AXIS_PAD,
        ),
        subscriptions,
    }
}
