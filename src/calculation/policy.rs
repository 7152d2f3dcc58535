//! Allowance policy: the seniority ladder and the effective-dated rate tables.
//!
//! An [`AllowancePolicy`] is everything the calculators need besides the
//! records themselves. It can come from the YAML configuration directory (see
//! [`crate::config::ConfigLoader`]) or from [`AllowancePolicy::default`], which
//! carries the built-in company table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::rate_table::RateTable;

/// Number of tiers at the top of the ladder that receive no allowance.
pub const DEFAULT_EXEMPT_TIERS: usize = 2;

/// The built-in seniority ladder, most senior first.
pub const DEFAULT_JOB_TITLES: [&str; 8] = [
    "CEO",
    "Director",
    "General Manager",
    "Deputy General Manager",
    "Manager",
    "Assistant Manager",
    "Senior Associate",
    "Associate",
];

/// An ordered list of job titles, most senior first.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::SeniorityLadder;
///
/// let ladder = SeniorityLadder::default();
/// assert!(ladder.is_exempt("CEO"));
/// assert!(ladder.is_exempt("Director"));
/// assert!(!ladder.is_exempt("Manager"));
/// assert!(!ladder.is_exempt("Intern"));
///
/// assert_eq!(ladder.rank("Director"), Some(1));
/// assert_eq!(ladder.rank("Intern"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeniorityLadder {
    titles: Vec<String>,
    exempt_tiers: usize,
}

impl SeniorityLadder {
    /// Creates a ladder. `exempt_tiers` is clamped to the number of titles.
    pub fn new(titles: Vec<String>, exempt_tiers: usize) -> Self {
        let exempt_tiers = exempt_tiers.min(titles.len());
        Self {
            titles,
            exempt_tiers,
        }
    }

    /// The titles, most senior first.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// How many of the top tiers are exempt.
    pub fn exempt_tiers(&self) -> usize {
        self.exempt_tiers
    }

    /// Zero-based rank of a title; `None` when the title is not on the ladder.
    pub fn rank(&self, job_title: &str) -> Option<usize> {
        let job_title = job_title.trim();
        self.titles.iter().position(|t| t == job_title)
    }

    /// Returns true if the title is in one of the exempt top tiers.
    pub fn is_exempt(&self, job_title: &str) -> bool {
        self.rank(job_title)
            .is_some_and(|rank| rank < self.exempt_tiers)
    }

    /// A sort key placing unknown titles after every known one.
    pub fn sort_key(&self, job_title: &str) -> usize {
        self.rank(job_title).unwrap_or(self.titles.len())
    }
}

impl Default for SeniorityLadder {
    fn default() -> Self {
        Self::new(
            DEFAULT_JOB_TITLES.iter().map(|t| t.to_string()).collect(),
            DEFAULT_EXEMPT_TIERS,
        )
    }
}

/// The complete set of rules used to price support work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowancePolicy {
    ladder: SeniorityLadder,
    /// Sorted oldest first.
    schedules: Vec<RateTable>,
}

impl AllowancePolicy {
    /// Creates a policy from a ladder and any number of rate tables.
    pub fn new(ladder: SeniorityLadder, mut schedules: Vec<RateTable>) -> Self {
        schedules.sort_by_key(RateTable::effective_date);
        Self { ladder, schedules }
    }

    /// The seniority ladder.
    pub fn ladder(&self) -> &SeniorityLadder {
        &self.ladder
    }

    /// Every rate table, oldest first.
    pub fn schedules(&self) -> &[RateTable] {
        &self.schedules
    }

    /// The rate table in force on `date`, if any.
    pub fn rates_on(&self, date: NaiveDate) -> Option<&RateTable> {
        self.schedules
            .iter()
            .rev()
            .find(|table| table.effective_date() <= date)
    }
}

impl Default for AllowancePolicy {
    fn default() -> Self {
        Self::new(SeniorityLadder::default(), vec![RateTable::builtin()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::rate_table::{DayClass, RateKey, RegionClass};
    use crate::models::EventType;
    use rust_decimal::Decimal;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ==========================================================================
    // EX-001: Top two tiers are exempt
    // ==========================================================================
    #[test]
    fn test_ex_001_top_two_tiers_exempt() {
        let ladder = SeniorityLadder::default();
        let exempt: Vec<&str> = DEFAULT_JOB_TITLES
            .iter()
            .copied()
            .filter(|t| ladder.is_exempt(t))
            .collect();
        assert_eq!(exempt, vec!["CEO", "Director"]);
    }

    #[test]
    fn test_title_is_trimmed_before_lookup() {
        let ladder = SeniorityLadder::default();
        assert!(ladder.is_exempt(" Director "));
    }

    #[test]
    fn test_exempt_tiers_clamped_to_title_count() {
        let ladder = SeniorityLadder::new(vec!["Owner".to_string()], 5);
        assert_eq!(ladder.exempt_tiers(), 1);
        assert!(ladder.is_exempt("Owner"));
    }

    #[test]
    fn test_sort_key_puts_unknown_titles_last() {
        let ladder = SeniorityLadder::default();
        assert!(ladder.sort_key("Associate") < ladder.sort_key("Contractor"));
        assert_eq!(ladder.sort_key("CEO"), 0);
    }

    #[test]
    fn test_rates_on_picks_latest_effective_table() {
        let mut raised = RateTable::new(make_date("2026-01-01"));
        for (key, amount) in RateTable::builtin().daily_cells() {
            raised.set_daily(key.day, key.region, key.event_type, amount);
        }
        raised.set_daily(
            DayClass::Workday,
            RegionClass::Regional,
            EventType::Pharma,
            Decimal::from(50_000),
        );

        let policy =
            AllowancePolicy::new(SeniorityLadder::default(), vec![raised, RateTable::builtin()]);
        let key = RateKey {
            day: DayClass::Workday,
            region: RegionClass::Regional,
            event_type: EventType::Pharma,
        };

        let before = policy.rates_on(make_date("2025-12-31")).unwrap();
        assert_eq!(before.daily_rate(key), Decimal::from(40_000));

        let after = policy.rates_on(make_date("2026-01-01")).unwrap();
        assert_eq!(after.daily_rate(key), Decimal::from(50_000));
    }

    #[test]
    fn test_rates_on_before_first_table_is_none() {
        let table = RateTable::new(make_date("2025-01-01"));
        let policy = AllowancePolicy::new(SeniorityLadder::default(), vec![table]);
        assert!(policy.rates_on(make_date("2024-12-31")).is_none());
    }

    #[test]
    fn test_default_policy_covers_any_date() {
        let policy = AllowancePolicy::default();
        assert!(policy.rates_on(make_date("1990-01-01")).is_some());
    }
}
