//! Per-day travel allowance calculation.
//!
//! This module prices a single day of work at an event, and the optional
//! setup day before it, using the rate table in force on the event's start
//! date and the seniority ladder's exemption rule.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Event, HolidaySet};

use super::calendar::{DayKind, get_day_kind};
use super::policy::AllowancePolicy;
use super::rate_table::{DayClass, RateKey, RegionClass, SetupRateKey};

/// The priced result for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAllowance {
    /// The day priced.
    pub date: NaiveDate,
    /// How the calendar classified the day.
    pub day_kind: DayKind,
    /// True when the job title is in an exempt tier.
    pub exempt: bool,
    /// The allowance owed. Zero when exempt or when no rate cell applies.
    pub amount: Decimal,
}

/// Calculates the travel allowance for one day of work at an event.
///
/// # Arguments
///
/// * `date` - The day worked
/// * `event` - The event the work was for; its type and region presence select the rate
/// * `job_title` - The worker's job title, checked against the exempt tiers
/// * `holidays` - Declared non-working days
/// * `policy` - Seniority ladder and rate tables
///
/// # Returns
///
/// A [`DailyAllowance`]. Exempt titles always get zero. Otherwise the amount
/// is the `(day class, region class, event type)` cell of the rate table in
/// force on the event's start date.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::{daily_allowance, AllowancePolicy};
/// use support_ledger::models::{Event, EventType, HolidaySet};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let event = Event {
///     id: "ev_001".to_string(),
///     name: "Regional Launch".to_string(),
///     start_date: NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 5, 12).unwrap(),
///     setup_date: None,
///     department: "Pharma Team 1".to_string(),
///     event_type: EventType::Pharma,
///     organizer_id: None,
///     region_id: Some("daejeon".to_string()),
///     region: Some("Daejeon".to_string()),
///     venue: None,
///     company: None,
///     product: None,
/// };
/// let policy = AllowancePolicy::default();
/// let holidays = HolidaySet::new();
///
/// // Monday, regional event
/// let day = daily_allowance(event.start_date, &event, "Manager", &holidays, &policy);
/// assert_eq!(day.amount, Decimal::from(40_000));
///
/// // Exempt title
/// let day = daily_allowance(event.start_date, &event, "CEO", &holidays, &policy);
/// assert_eq!(day.amount, Decimal::ZERO);
/// assert!(day.exempt);
/// ```
pub fn daily_allowance(
    date: NaiveDate,
    event: &Event,
    job_title: &str,
    holidays: &HolidaySet,
    policy: &AllowancePolicy,
) -> DailyAllowance {
    let day_kind = get_day_kind(date, holidays);
    let exempt = policy.ladder().is_exempt(job_title);

    let amount = if exempt {
        Decimal::ZERO
    } else {
        let key = RateKey {
            day: DayClass::from_rest(day_kind.is_rest()),
            region: RegionClass::from_has_region(event.has_region()),
            event_type: event.event_type,
        };
        match policy.rates_on(event.start_date) {
            Some(table) => table.daily_rate(key),
            None => {
                warn!(
                    event_id = %event.id,
                    start_date = %event.start_date,
                    "No rate table in effect for event; pricing day at zero"
                );
                Decimal::ZERO
            }
        }
    };

    DailyAllowance {
        date,
        day_kind,
        exempt,
        amount,
    }
}

/// Calculates the allowance for an event's setup day.
///
/// Returns `None` when the event has no setup date. Exemption applies as for
/// [`daily_allowance`]; the amount comes from the setup cells of the rate table,
/// so only a conference whose setup day is a rest day pays anything under the
/// built-in table.
pub fn setup_day_allowance(
    event: &Event,
    job_title: &str,
    holidays: &HolidaySet,
    policy: &AllowancePolicy,
) -> Option<DailyAllowance> {
    let date = event.setup_date?;
    let day_kind = get_day_kind(date, holidays);
    let exempt = policy.ladder().is_exempt(job_title);

    let amount = if exempt {
        Decimal::ZERO
    } else {
        let key = SetupRateKey {
            day: DayClass::from_rest(day_kind.is_rest()),
            event_type: event.event_type,
        };
        policy
            .rates_on(event.start_date)
            .map(|table| table.setup_rate(key))
            .unwrap_or(Decimal::ZERO)
    };

    Some(DailyAllowance {
        date,
        day_kind,
        exempt,
        amount,
    })
}

/// Sums [`daily_allowance`] over every day of the event span.
pub fn span_allowance(
    event: &Event,
    job_title: &str,
    holidays: &HolidaySet,
    policy: &AllowancePolicy,
) -> Decimal {
    event
        .days()
        .map(|date| daily_allowance(date, event, job_title, holidays, policy).amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::policy::DEFAULT_JOB_TITLES;
    use crate::calculation::rate_table::RateTable;
    use crate::calculation::SeniorityLadder;
    use crate::models::EventType;
    use proptest::prelude::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn create_test_event(event_type: EventType, region: bool, start: &str, end: &str) -> Event {
        Event {
            id: "ev_001".to_string(),
            name: "Test Event".to_string(),
            start_date: make_date(start),
            end_date: make_date(end),
            setup_date: None,
            department: "Conference Team 1".to_string(),
            event_type,
            organizer_id: Some("emp_001".to_string()),
            region_id: region.then(|| "busan".to_string()),
            region: region.then(|| "Busan".to_string()),
            venue: None,
            company: None,
            product: None,
        }
    }

    // ==========================================================================
    // DA-001: Regional workday pays the flat rate
    // ==========================================================================
    #[test]
    fn test_da_001_regional_workday() {
        let policy = AllowancePolicy::default();
        // 2025-05-13 is a Tuesday
        let event = create_test_event(EventType::Conference, true, "2025-05-13", "2025-05-13");
        let day = daily_allowance(
            make_date("2025-05-13"),
            &event,
            "Manager",
            &HolidaySet::new(),
            &policy,
        );
        assert_eq!(day.day_kind, DayKind::Workday);
        assert_eq!(day.amount, dec(40_000));
        assert!(!day.exempt);
    }

    // ==========================================================================
    // DA-002: Local workday pays nothing
    // ==========================================================================
    #[test]
    fn test_da_002_local_workday() {
        let policy = AllowancePolicy::default();
        let event = create_test_event(EventType::Pharma, false, "2025-05-13", "2025-05-13");
        let day = daily_allowance(
            make_date("2025-05-13"),
            &event,
            "Associate",
            &HolidaySet::new(),
            &policy,
        );
        assert_eq!(day.amount, Decimal::ZERO);
    }

    // ==========================================================================
    // DA-003: Pharma without region on a declared holiday pays C1
    // ==========================================================================
    #[test]
    fn test_da_003_local_pharma_on_holiday() {
        let policy = AllowancePolicy::default();
        // 2025-06-06 is a Friday, declared holiday
        let holidays: HolidaySet = [make_date("2025-06-06")].into_iter().collect();
        let event = create_test_event(EventType::Pharma, false, "2025-06-06", "2025-06-06");
        let day = daily_allowance(make_date("2025-06-06"), &event, "Manager", &holidays, &policy);
        assert_eq!(day.day_kind, DayKind::Holiday);
        assert_eq!(day.amount, dec(70_000));
    }

    // ==========================================================================
    // DA-004: Rest-day rates by type and region
    // ==========================================================================
    #[test]
    fn test_da_004_rest_day_rates() {
        let policy = AllowancePolicy::default();
        let none = HolidaySet::new();
        // 2025-05-17 is a Saturday
        let saturday = make_date("2025-05-17");

        let cases = [
            (EventType::Pharma, true, 90_000),
            (EventType::Conference, true, 150_000),
            (EventType::Pharma, false, 70_000),
            (EventType::Conference, false, 150_000),
            (EventType::Other, true, 0),
            (EventType::Other, false, 0),
        ];
        for (event_type, region, expected) in cases {
            let event = create_test_event(event_type, region, "2025-05-17", "2025-05-17");
            let day = daily_allowance(saturday, &event, "Manager", &none, &policy);
            assert_eq!(
                day.amount,
                dec(expected),
                "{} region={}",
                event_type,
                region
            );
        }
    }

    // ==========================================================================
    // DA-005: Director is exempt on any day of any event
    // ==========================================================================
    #[test]
    fn test_da_005_director_exempt() {
        let policy = AllowancePolicy::default();
        let mut event = create_test_event(EventType::Conference, true, "2025-05-16", "2025-05-18");
        event.setup_date = Some(make_date("2025-05-15"));
        let none = HolidaySet::new();

        assert_eq!(span_allowance(&event, "Director", &none, &policy), Decimal::ZERO);
        for date in event.days() {
            let day = daily_allowance(date, &event, "Director", &none, &policy);
            assert!(day.exempt);
            assert_eq!(day.amount, Decimal::ZERO);
        }
    }

    // ==========================================================================
    // SD-001: Conference with a Sunday setup day pays D
    // ==========================================================================
    #[test]
    fn test_sd_001_conference_sunday_setup() {
        let policy = AllowancePolicy::default();
        let mut event = create_test_event(EventType::Conference, true, "2025-05-19", "2025-05-20");
        // 2025-05-18 is a Sunday
        event.setup_date = Some(make_date("2025-05-18"));

        let setup = setup_day_allowance(&event, "Manager", &HolidaySet::new(), &policy).unwrap();
        assert_eq!(setup.date, make_date("2025-05-18"));
        assert_eq!(setup.day_kind, DayKind::Weekend);
        assert_eq!(setup.amount, dec(70_000));
    }

    #[test]
    fn test_setup_on_workday_pays_nothing() {
        let policy = AllowancePolicy::default();
        let mut event = create_test_event(EventType::Conference, true, "2025-05-14", "2025-05-15");
        event.setup_date = Some(make_date("2025-05-13"));
        let setup = setup_day_allowance(&event, "Manager", &HolidaySet::new(), &policy).unwrap();
        assert_eq!(setup.amount, Decimal::ZERO);
    }

    #[test]
    fn test_setup_for_pharma_pays_nothing() {
        let policy = AllowancePolicy::default();
        let mut event = create_test_event(EventType::Pharma, true, "2025-05-19", "2025-05-19");
        event.setup_date = Some(make_date("2025-05-18"));
        let setup = setup_day_allowance(&event, "Manager", &HolidaySet::new(), &policy).unwrap();
        assert_eq!(setup.amount, Decimal::ZERO);
    }

    #[test]
    fn test_setup_absent_returns_none() {
        let policy = AllowancePolicy::default();
        let event = create_test_event(EventType::Conference, true, "2025-05-19", "2025-05-19");
        assert!(setup_day_allowance(&event, "Manager", &HolidaySet::new(), &policy).is_none());
    }

    #[test]
    fn test_setup_exempt_title() {
        let policy = AllowancePolicy::default();
        let mut event = create_test_event(EventType::Conference, true, "2025-05-19", "2025-05-19");
        event.setup_date = Some(make_date("2025-05-18"));
        let setup = setup_day_allowance(&event, "CEO", &HolidaySet::new(), &policy).unwrap();
        assert!(setup.exempt);
        assert_eq!(setup.amount, Decimal::ZERO);
    }

    #[test]
    fn test_span_allowance_three_regional_weekdays() {
        let policy = AllowancePolicy::default();
        // Mon 2025-05-12 .. Wed 2025-05-14
        let event = create_test_event(EventType::Conference, true, "2025-05-12", "2025-05-14");
        assert_eq!(
            span_allowance(&event, "Manager", &HolidaySet::new(), &policy),
            dec(120_000)
        );
    }

    #[test]
    fn test_span_mixing_weekday_and_weekend() {
        let policy = AllowancePolicy::default();
        // Fri 2025-05-16 .. Sun 2025-05-18, regional pharma
        let event = create_test_event(EventType::Pharma, true, "2025-05-16", "2025-05-18");
        assert_eq!(
            span_allowance(&event, "Manager", &HolidaySet::new(), &policy),
            dec(40_000 + 90_000 + 90_000)
        );
    }

    #[test]
    fn test_rates_follow_event_start_date() {
        let mut later = RateTable::new(make_date("2025-05-13"));
        later.set_daily(
            DayClass::Workday,
            RegionClass::Regional,
            EventType::Conference,
            dec(99_000),
        );
        let policy = AllowancePolicy::new(
            SeniorityLadder::default(),
            vec![RateTable::builtin(), later],
        );

        // Starts before the new table; its second day still uses the old one.
        let event = create_test_event(EventType::Conference, true, "2025-05-12", "2025-05-13");
        let day = daily_allowance(
            make_date("2025-05-13"),
            &event,
            "Manager",
            &HolidaySet::new(),
            &policy,
        );
        assert_eq!(day.amount, dec(40_000));
    }

    #[test]
    fn test_no_rate_table_in_effect_pays_zero() {
        let policy = AllowancePolicy::new(
            SeniorityLadder::default(),
            vec![RateTable::new(make_date("2030-01-01"))],
        );
        let event = create_test_event(EventType::Conference, true, "2025-05-12", "2025-05-12");
        let day = daily_allowance(
            make_date("2025-05-12"),
            &event,
            "Manager",
            &HolidaySet::new(),
            &policy,
        );
        assert_eq!(day.amount, Decimal::ZERO);
    }

    fn arb_event_type() -> impl Strategy<Value = EventType> {
        prop::sample::select(EventType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn exempt_titles_always_get_zero(
            title_index in 0usize..2,
            event_type in arb_event_type(),
            region in any::<bool>(),
            offset in 0i64..730,
            holiday in any::<bool>(),
        ) {
            let policy = AllowancePolicy::default();
            let date = make_date("2025-01-01") + chrono::Duration::days(offset);
            let holidays: HolidaySet = if holiday { [date].into_iter().collect() } else { HolidaySet::new() };

            let mut event = create_test_event(event_type, region, "2025-01-01", "2025-01-01");
            event.start_date = date;
            event.end_date = date;
            event.setup_date = date.pred_opt();

            let title = DEFAULT_JOB_TITLES[title_index];
            prop_assert_eq!(daily_allowance(date, &event, title, &holidays, &policy).amount, Decimal::ZERO);
            prop_assert_eq!(
                setup_day_allowance(&event, title, &holidays, &policy).map(|s| s.amount),
                Some(Decimal::ZERO)
            );
        }

        #[test]
        fn amounts_are_whole_and_non_negative(
            title_index in 0usize..DEFAULT_JOB_TITLES.len(),
            event_type in arb_event_type(),
            region in any::<bool>(),
            offset in 0i64..730,
        ) {
            let policy = AllowancePolicy::default();
            let date = make_date("2025-01-01") + chrono::Duration::days(offset);
            let mut event = create_test_event(event_type, region, "2025-01-01", "2025-01-01");
            event.start_date = date;
            event.end_date = date;

            let amount = daily_allowance(date, &event, DEFAULT_JOB_TITLES[title_index], &HolidaySet::new(), &policy).amount;
            prop_assert!(amount >= Decimal::ZERO);
            prop_assert!(amount.fract().is_zero());
        }
    }
}
