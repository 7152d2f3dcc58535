//! Event model and related types.
//!
//! This module defines the [`Event`] struct and the [`EventType`] enum for
//! representing scheduled events whose organizer and supporters may be owed
//! travel allowance.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The category of an event.
///
/// The category selects the rest-day rate in the allowance table. Only the two
/// named categories carry rates; anything else deserializes as [`EventType::Other`].
/// The portal's Korean category labels are accepted as aliases.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Events run for pharmaceutical clients.
    #[serde(alias = "제약행사")]
    Pharma,
    /// Academic or medical conferences.
    #[serde(alias = "학회행사")]
    Conference,
    /// Any other category. Pays nothing on rest days.
    #[default]
    #[serde(other)]
    Other,
}

impl EventType {
    /// All event types, in table order.
    pub const ALL: [EventType; 3] = [EventType::Pharma, EventType::Conference, EventType::Other];
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Pharma => write!(f, "pharma"),
            EventType::Conference => write!(f, "conference"),
            EventType::Other => write!(f, "other"),
        }
    }
}

/// A scheduled event.
///
/// # Example
///
/// ```
/// use support_ledger::models::{Event, EventType};
/// use chrono::NaiveDate;
///
/// let event = Event {
///     id: "ev_001".to_string(),
///     name: "Oncology Symposium".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 5, 14).unwrap(),
///     setup_date: Some(NaiveDate::from_ymd_opt(2025, 5, 11).unwrap()),
///     department: "Conference Team 1".to_string(),
///     event_type: EventType::Conference,
///     organizer_id: Some("emp_001".to_string()),
///     region_id: Some("busan".to_string()),
///     region: Some("Busan".to_string()),
///     venue: Some("BEXCO".to_string()),
///     company: None,
///     product: None,
/// };
///
/// assert!(event.has_region());
/// assert_eq!(event.days().count(), 3);
/// assert!(event.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for the event.
    pub id: String,
    /// Display name of the event.
    pub name: String,
    /// First day of the event (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the event (inclusive).
    pub end_date: NaiveDate,
    /// Optional pre-event labour day, on or immediately before the start date.
    #[serde(default)]
    pub setup_date: Option<NaiveDate>,
    /// The department running the event.
    pub department: String,
    /// The event category.
    pub event_type: EventType,
    /// The employee who organizes the event, if one is recorded.
    #[serde(default)]
    pub organizer_id: Option<String>,
    /// Reference to a recorded region. Only its presence affects pay.
    #[serde(default)]
    pub region_id: Option<String>,
    /// Region label for display.
    #[serde(default)]
    pub region: Option<String>,
    /// Venue label for display.
    #[serde(default)]
    pub venue: Option<String>,
    /// Client company label for display.
    #[serde(default)]
    pub company: Option<String>,
    /// Product label for display.
    #[serde(default)]
    pub product: Option<String>,
}

impl Event {
    /// Returns true if the event references a recorded region.
    pub fn has_region(&self) -> bool {
        self.region_id.as_deref().is_some_and(|r| !r.trim().is_empty())
    }

    /// Iterates over every calendar day from the start date to the end date, inclusive.
    ///
    /// Yields nothing if the end date precedes the start date.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    /// Checks the event invariants.
    ///
    /// The end date must not precede the start date, and a setup date, if
    /// present, must be the start date or the day immediately before it.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::InvalidEvent {
                event_id: self.id.clone(),
                message: format!(
                    "end date {} is before start date {}",
                    self.end_date, self.start_date
                ),
            });
        }

        if let Some(setup) = self.setup_date {
            let day_before = self.start_date - Duration::days(1);
            if setup != self.start_date && setup != day_before {
                return Err(EngineError::InvalidEvent {
                    event_id: self.id.clone(),
                    message: format!(
                        "setup date {} must be {} or {}",
                        setup, day_before, self.start_date
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_event() -> Event {
        Event {
            id: "ev_001".to_string(),
            name: "Oncology Symposium".to_string(),
            start_date: make_date("2025-05-12"),
            end_date: make_date("2025-05-14"),
            setup_date: None,
            department: "Conference Team 1".to_string(),
            event_type: EventType::Conference,
            organizer_id: Some("emp_001".to_string()),
            region_id: None,
            region: None,
            venue: Some("COEX".to_string()),
            company: None,
            product: None,
        }
    }

    #[test]
    fn test_deserialize_event_with_optional_fields_missing() {
        let json = r#"{
            "id": "ev_002",
            "name": "Product Launch",
            "start_date": "2025-06-02",
            "end_date": "2025-06-02",
            "department": "Pharma Team 2",
            "event_type": "pharma"
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Pharma);
        assert_eq!(event.setup_date, None);
        assert_eq!(event.organizer_id, None);
        assert!(!event.has_region());
    }

    #[test]
    fn test_unknown_event_type_deserializes_as_other() {
        let event_type: EventType = serde_json::from_str("\"workshop\"").unwrap();
        assert_eq!(event_type, EventType::Other);
    }

    #[test]
    fn test_event_type_serialization() {
        assert_eq!(
            serde_json::to_string(&EventType::Conference).unwrap(),
            "\"conference\""
        );
        assert_eq!(
            serde_json::to_string(&EventType::Pharma).unwrap(),
            "\"pharma\""
        );
    }

    #[test]
    fn test_has_region_requires_non_blank_reference() {
        let mut event = create_test_event();
        assert!(!event.has_region());

        event.region_id = Some("  ".to_string());
        assert!(!event.has_region());

        event.region_id = Some("daegu".to_string());
        assert!(event.has_region());
    }

    #[test]
    fn test_region_label_alone_does_not_count_as_region() {
        let mut event = create_test_event();
        event.region = Some("Seoul".to_string());
        assert!(!event.has_region());
    }

    #[test]
    fn test_days_are_inclusive() {
        let event = create_test_event();
        let days: Vec<NaiveDate> = event.days().collect();
        assert_eq!(
            days,
            vec![
                make_date("2025-05-12"),
                make_date("2025-05-13"),
                make_date("2025-05-14")
            ]
        );
    }

    #[test]
    fn test_days_empty_when_end_precedes_start() {
        let mut event = create_test_event();
        event.end_date = make_date("2025-05-10");
        assert_eq!(event.days().count(), 0);
    }

    #[test]
    fn test_validate_accepts_setup_day_before_start() {
        let mut event = create_test_event();
        event.setup_date = Some(make_date("2025-05-11"));
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_setup_on_start() {
        let mut event = create_test_event();
        event.setup_date = Some(make_date("2025-05-12"));
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_early_setup() {
        let mut event = create_test_event();
        event.setup_date = Some(make_date("2025-05-09"));
        match event.validate() {
            Err(EngineError::InvalidEvent { event_id, .. }) => assert_eq!(event_id, "ev_001"),
            other => panic!("Expected InvalidEvent, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let mut event = create_test_event();
        event.end_date = make_date("2025-05-01");
        assert!(event.validate().is_err());
    }
}
