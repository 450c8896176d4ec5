//! Booking entity - append-only audit record of a completed negotiation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Load;
use crate::value_objects::{CallDuration, LoadId, McNumber, Rate};

/// Outcome of a rate negotiation with a carrier
///
/// `load_id` is a logical reference; bookings outlive deleted loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned id, `None` until persisted
    pub id: Option<i64>,
    pub load_id: LoadId,
    pub mc_num: McNumber,
    pub initial_rate: Option<Rate>,
    pub final_rate: Option<Rate>,
    pub transcript: Option<String>,
    pub sentiment: Option<String>,
    /// Call length in seconds
    pub duration: Option<CallDuration>,
    /// Write time
    pub timestamp: DateTime<Utc>,
}

impl Booking {
    /// Create an unsaved booking stamped with the current time
    #[must_use]
    pub fn new(load_id: LoadId, mc_num: McNumber) -> Self {
        Self {
            id: None,
            load_id,
            mc_num,
            initial_rate: None,
            final_rate: None,
            transcript: None,
            sentiment: None,
            duration: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the opening and agreed rates
    #[must_use]
    pub const fn with_rates(mut self, initial: Option<Rate>, final_rate: Option<Rate>) -> Self {
        self.initial_rate = initial;
        self.final_rate = final_rate;
        self
    }

    /// Attach the call transcript
    #[must_use]
    pub fn with_transcript(mut self, transcript: Option<String>) -> Self {
        self.transcript = transcript;
        self
    }

    /// Attach the sentiment label
    #[must_use]
    pub fn with_sentiment(mut self, sentiment: Option<String>) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Attach the call length
    #[must_use]
    pub const fn with_duration(mut self, duration: Option<CallDuration>) -> Self {
        self.duration = duration;
        self
    }

    /// Override the timestamp
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// `final - initial`, when both rates are known
    #[must_use]
    pub fn rate_difference(&self) -> Option<f64> {
        match (self.initial_rate, self.final_rate) {
            (Some(initial), Some(final_rate)) => Some(final_rate.value() - initial.value()),
            _ => None,
        }
    }
}

/// A booking together with its load, if the load still exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(flatten)]
    pub booking: Booking,
    pub load: Option<Load>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking::new(
            LoadId::parse("LOAD002").unwrap(),
            McNumber::parse("123456").unwrap(),
        )
    }

    #[test]
    fn new_booking_is_unsaved() {
        let b = booking();
        assert!(b.id.is_none());
        assert!(b.initial_rate.is_none());
        assert!(b.rate_difference().is_none());
    }

    #[test]
    fn rate_difference_is_final_minus_initial() {
        let b = booking().with_rates(
            Some(Rate::new(1800.0).unwrap()),
            Some(Rate::new(1650.0).unwrap()),
        );
        let diff = b.rate_difference().unwrap();
        assert!((diff + 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_difference_needs_both_rates() {
        let b = booking().with_rates(None, Some(Rate::new(1650.0).unwrap()));
        assert!(b.rate_difference().is_none());
    }

    #[test]
    fn record_flattens_booking_fields() {
        let record = BookingRecord {
            booking: booking().with_sentiment(Some("positive".to_string())),
            load: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["load_id"], "LOAD002");
        assert_eq!(json["mc_num"], "123456");
        assert_eq!(json["sentiment"], "positive");
        assert!(json["load"].is_null());
    }
}
