//! # Weekboard Backfill
//!
//! Asks the external collector to fill a missing `08:00` or `18:00` slot.
//! The call is fire and poll: the trigger only reports whether the
//! collector accepted the request, and the new row shows up in the store
//! later, which the dashboard notices through the data-version marker.
//!
//! ## Example
//!
//! ```rust,ignore
//! use weekboard_backfill::HttpBackfillTrigger;
//!
//! let trigger = HttpBackfillTrigger::new("https://automation.example.com/webhook/backfill")?;
//! trigger.trigger(&BackfillRequest::new(date, TimeSlot::Morning)).await?;
//! ```

mod delivery;
mod error;
mod trigger;

pub use delivery::{BackfillDelivery, BackfillJob, DEFAULT_TIMEOUT_MS};
pub use error::{BackfillError, BackfillResult};
#[cfg(feature = "http-client")]
pub use trigger::HttpBackfillTrigger;
pub use trigger::DisabledBackfill;
