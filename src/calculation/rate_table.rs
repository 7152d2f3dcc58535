//! Declarative travel allowance rate table.
//!
//! The business rule lives here as data: a mapping from
//! `(day class, region class, event type)` to a per-day amount, plus a mapping
//! from `(day class, event type)` to a setup-day amount. Cells that are absent
//! pay nothing.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::EventType;

/// Flat rate for a working day at an event with a recorded region.
pub const WORKDAY_REGIONAL_RATE: Decimal = Decimal::from_parts(40_000, 0, 0, false, 0);

/// Rest-day rate for a pharma event with a recorded region.
pub const REST_DAY_PHARMA_REGIONAL_RATE: Decimal = Decimal::from_parts(90_000, 0, 0, false, 0);

/// Rest-day rate for a conference, with or without a recorded region.
pub const REST_DAY_CONFERENCE_RATE: Decimal = Decimal::from_parts(150_000, 0, 0, false, 0);

/// Rest-day rate for a pharma event without a recorded region.
pub const REST_DAY_PHARMA_LOCAL_RATE: Decimal = Decimal::from_parts(70_000, 0, 0, false, 0);

/// Setup-day rate for a conference whose setup day is a rest day.
pub const CONFERENCE_SETUP_RATE: Decimal = Decimal::from_parts(70_000, 0, 0, false, 0);

/// Whether a day is a working day or a rest day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayClass {
    /// A weekday that is not a declared holiday.
    Workday,
    /// A weekend day or a declared holiday.
    RestDay,
}

impl DayClass {
    /// Maps a rest-day flag to a class.
    pub fn from_rest(is_rest: bool) -> Self {
        if is_rest {
            DayClass::RestDay
        } else {
            DayClass::Workday
        }
    }
}

/// Whether an event references a recorded region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionClass {
    /// The event has a region reference.
    Regional,
    /// The event has no region reference.
    Local,
}

impl RegionClass {
    /// Maps a has-region flag to a class.
    pub fn from_has_region(has_region: bool) -> Self {
        if has_region {
            RegionClass::Regional
        } else {
            RegionClass::Local
        }
    }
}

/// Key of a daily rate cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RateKey {
    /// Working day or rest day.
    pub day: DayClass,
    /// Regional or local event.
    pub region: RegionClass,
    /// Event category.
    pub event_type: EventType,
}

/// Key of a setup-day rate cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetupRateKey {
    /// Working day or rest day.
    pub day: DayClass,
    /// Event category.
    pub event_type: EventType,
}

/// A rate table in force from its effective date.
///
/// # Example
///
/// ```
/// use support_ledger::calculation::{DayClass, RateKey, RateTable, RegionClass};
/// use support_ledger::models::EventType;
/// use rust_decimal::Decimal;
///
/// let table = RateTable::builtin();
/// let key = RateKey {
///     day: DayClass::RestDay,
///     region: RegionClass::Local,
///     event_type: EventType::Pharma,
/// };
/// assert_eq!(table.daily_rate(key), Decimal::from(70_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    effective_date: NaiveDate,
    daily: BTreeMap<RateKey, Decimal>,
    setup: BTreeMap<SetupRateKey, Decimal>,
}

impl RateTable {
    /// Creates an empty table effective from `effective_date`.
    pub fn new(effective_date: NaiveDate) -> Self {
        Self {
            effective_date,
            daily: BTreeMap::new(),
            setup: BTreeMap::new(),
        }
    }

    /// The built-in company rate table, effective for all dates.
    ///
    /// | day      | region   | pharma | conference | other  |
    /// |----------|----------|--------|------------|--------|
    /// | workday  | regional | 40000  | 40000      | 40000  |
    /// | workday  | local    | 0      | 0          | 0      |
    /// | rest day | regional | 90000  | 150000     | 0      |
    /// | rest day | local    | 70000  | 150000     | 0      |
    ///
    /// Setup day: 70000 for a conference whose setup day is a rest day.
    pub fn builtin() -> Self {
        let mut table = Self::new(NaiveDate::MIN);

        for event_type in EventType::ALL {
            table.set_daily(
                DayClass::Workday,
                RegionClass::Regional,
                event_type,
                WORKDAY_REGIONAL_RATE,
            );
        }

        table.set_daily(
            DayClass::RestDay,
            RegionClass::Regional,
            EventType::Pharma,
            REST_DAY_PHARMA_REGIONAL_RATE,
        );
        table.set_daily(
            DayClass::RestDay,
            RegionClass::Regional,
            EventType::Conference,
            REST_DAY_CONFERENCE_RATE,
        );
        table.set_daily(
            DayClass::RestDay,
            RegionClass::Local,
            EventType::Pharma,
            REST_DAY_PHARMA_LOCAL_RATE,
        );
        // Local conferences pay the regional conference rate.
        table.set_daily(
            DayClass::RestDay,
            RegionClass::Local,
            EventType::Conference,
            REST_DAY_CONFERENCE_RATE,
        );

        table.set_setup(DayClass::RestDay, EventType::Conference, CONFERENCE_SETUP_RATE);

        table
    }

    /// The first date this table applies to.
    pub fn effective_date(&self) -> NaiveDate {
        self.effective_date
    }

    /// Sets a daily rate cell, replacing any previous amount.
    pub fn set_daily(
        &mut self,
        day: DayClass,
        region: RegionClass,
        event_type: EventType,
        amount: Decimal,
    ) {
        self.daily.insert(
            RateKey {
                day,
                region,
                event_type,
            },
            amount,
        );
    }

    /// Sets a setup-day rate cell, replacing any previous amount.
    pub fn set_setup(&mut self, day: DayClass, event_type: EventType, amount: Decimal) {
        self.setup.insert(SetupRateKey { day, event_type }, amount);
    }

    /// The daily amount for a cell; zero when the cell is absent.
    pub fn daily_rate(&self, key: RateKey) -> Decimal {
        self.daily.get(&key).copied().unwrap_or(Decimal::ZERO)
    }

    /// The setup-day amount for a cell; zero when the cell is absent.
    pub fn setup_rate(&self, key: SetupRateKey) -> Decimal {
        self.setup.get(&key).copied().unwrap_or(Decimal::ZERO)
    }

    /// Iterates every populated daily cell.
    pub fn daily_cells(&self) -> impl Iterator<Item = (RateKey, Decimal)> + '_ {
        self.daily.iter().map(|(k, v)| (*k, *v))
    }

    /// Iterates every populated setup cell.
    pub fn setup_cells(&self) -> impl Iterator<Item = (SetupRateKey, Decimal)> + '_ {
        self.setup.iter().map(|(k, v)| (*k, *v))
    }

    /// Checks that every amount is a whole, non-negative number.
    ///
    /// Returns a description of the first offending cell.
    pub fn validate(&self) -> Result<(), String> {
        let daily = self
            .daily_cells()
            .map(|(k, v)| (format!("{:?}/{:?}/{}", k.day, k.region, k.event_type), v));
        let setup = self
            .setup_cells()
            .map(|(k, v)| (format!("setup {:?}/{}", k.day, k.event_type), v));

        for (cell, amount) in daily.chain(setup) {
            if amount.is_sign_negative() && !amount.is_zero() {
                return Err(format!("{} amount {} is negative", cell, amount));
            }
            if !amount.fract().is_zero() {
                return Err(format!("{} amount {} is not a whole number", cell, amount));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(day: DayClass, region: RegionClass, event_type: EventType) -> RateKey {
        RateKey {
            day,
            region,
            event_type,
        }
    }

    // ==========================================================================
    // RT-001..RT-012: every cell of the built-in table
    // ==========================================================================
    #[test]
    fn test_rt_workday_regional_cells_pay_flat_rate() {
        let table = RateTable::builtin();
        for event_type in EventType::ALL {
            assert_eq!(
                table.daily_rate(key(DayClass::Workday, RegionClass::Regional, event_type)),
                Decimal::from(40_000),
                "workday/regional/{}",
                event_type
            );
        }
    }

    #[test]
    fn test_rt_workday_local_cells_pay_nothing() {
        let table = RateTable::builtin();
        for event_type in EventType::ALL {
            assert_eq!(
                table.daily_rate(key(DayClass::Workday, RegionClass::Local, event_type)),
                Decimal::ZERO,
                "workday/local/{}",
                event_type
            );
        }
    }

    #[test]
    fn test_rt_rest_day_regional_pharma() {
        let table = RateTable::builtin();
        assert_eq!(
            table.daily_rate(key(DayClass::RestDay, RegionClass::Regional, EventType::Pharma)),
            Decimal::from(90_000)
        );
    }

    #[test]
    fn test_rt_rest_day_regional_conference() {
        let table = RateTable::builtin();
        assert_eq!(
            table.daily_rate(key(
                DayClass::RestDay,
                RegionClass::Regional,
                EventType::Conference
            )),
            Decimal::from(150_000)
        );
    }

    #[test]
    fn test_rt_rest_day_local_pharma_is_lower_rate() {
        let table = RateTable::builtin();
        assert_eq!(
            table.daily_rate(key(DayClass::RestDay, RegionClass::Local, EventType::Pharma)),
            Decimal::from(70_000)
        );
    }

    #[test]
    fn test_rt_rest_day_local_conference_reuses_regional_rate() {
        let table = RateTable::builtin();
        assert_eq!(
            table.daily_rate(key(DayClass::RestDay, RegionClass::Local, EventType::Conference)),
            table.daily_rate(key(
                DayClass::RestDay,
                RegionClass::Regional,
                EventType::Conference
            ))
        );
    }

    #[test]
    fn test_rt_rest_day_other_type_pays_nothing() {
        let table = RateTable::builtin();
        for region in [RegionClass::Regional, RegionClass::Local] {
            assert_eq!(
                table.daily_rate(key(DayClass::RestDay, region, EventType::Other)),
                Decimal::ZERO
            );
        }
    }

    #[test]
    fn test_rt_setup_cells() {
        let table = RateTable::builtin();
        let setup = |day, event_type| table.setup_rate(SetupRateKey { day, event_type });

        assert_eq!(
            setup(DayClass::RestDay, EventType::Conference),
            Decimal::from(70_000)
        );
        assert_eq!(setup(DayClass::Workday, EventType::Conference), Decimal::ZERO);
        assert_eq!(setup(DayClass::RestDay, EventType::Pharma), Decimal::ZERO);
        assert_eq!(setup(DayClass::RestDay, EventType::Other), Decimal::ZERO);
    }

    #[test]
    fn test_builtin_table_is_valid() {
        assert!(RateTable::builtin().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_fractional_amount() {
        let mut table = RateTable::new(NaiveDate::MIN);
        table.set_daily(
            DayClass::RestDay,
            RegionClass::Local,
            EventType::Pharma,
            Decimal::new(705, 1),
        );
        let message = table.validate().unwrap_err();
        assert!(message.contains("not a whole number"), "{}", message);
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut table = RateTable::new(NaiveDate::MIN);
        table.set_setup(DayClass::RestDay, EventType::Conference, Decimal::from(-1));
        let message = table.validate().unwrap_err();
        assert!(message.contains("negative"), "{}", message);
    }

    #[test]
    fn test_set_daily_replaces_cell() {
        let mut table = RateTable::builtin();
        let cell = key(DayClass::Workday, RegionClass::Regional, EventType::Pharma);
        table.set_daily(cell.day, cell.region, cell.event_type, Decimal::from(45_000));
        assert_eq!(table.daily_rate(cell), Decimal::from(45_000));
    }

    #[test]
    fn test_day_and_region_class_from_flags() {
        assert_eq!(DayClass::from_rest(true), DayClass::RestDay);
        assert_eq!(DayClass::from_rest(false), DayClass::Workday);
        assert_eq!(RegionClass::from_has_region(true), RegionClass::Regional);
        assert_eq!(RegionClass::from_has_region(false), RegionClass::Local);
    }
}
