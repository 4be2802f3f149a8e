use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Deserialize;

/// Whether a calendar day is a weekday or a weekend day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    Weekend,
}

/// Days of the week on which an appliance is used.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    #[default]
    All,
    Weekdays,
    Weekends,
}

impl DayType {
    /// Returns `true` when an appliance of this type runs on a day of `kind`.
    pub fn matches(self, kind: DayKind) -> bool {
        match self {
            Self::All => true,
            Self::Weekdays => kind == DayKind::Weekday,
            Self::Weekends => kind == DayKind::Weekend,
        }
    }
}

/// Maps simulated day indices onto calendar dates.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use demand_sim::sim::calendar::{Calendar, DayKind};
///
/// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
/// let calendar = Calendar::new(start);
/// // 2025-01-04 is a Saturday
/// assert_eq!(calendar.kind(3), DayKind::Weekend);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    start: NaiveDate,
}

impl Calendar {
    pub fn new(start: NaiveDate) -> Self {
        Self { start }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Date of day `day`; saturates at the last representable date.
    pub fn date(&self, day: usize) -> NaiveDate {
        self.start
            .checked_add_days(Days::new(day as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn kind(&self, day: usize) -> DayKind {
        match self.date(day).weekday() {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }

    /// `(year, month)` containing day `day`.
    pub fn month(&self, day: usize) -> (i32, u32) {
        let date = self.date(day);
        (date.year(), date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar() -> Calendar {
        Calendar::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default())
    }

    #[test]
    fn first_day_is_start_date() {
        let c = calendar();
        assert_eq!(c.date(0), c.start());
        // 2025-01-01 is a Wednesday
        assert_eq!(c.kind(0), DayKind::Weekday);
    }

    #[test]
    fn weekends_are_detected() {
        let c = calendar();
        let kinds: Vec<DayKind> = (0..7).map(|d| c.kind(d)).collect();
        assert_eq!(
            kinds,
            vec![
                DayKind::Weekday,
                DayKind::Weekday,
                DayKind::Weekday,
                DayKind::Weekend,
                DayKind::Weekend,
                DayKind::Weekday,
                DayKind::Weekday,
            ]
        );
    }

    #[test]
    fn months_roll_over() {
        let c = calendar();
        assert_eq!(c.month(30), (2025, 1));
        assert_eq!(c.month(31), (2025, 2));
        assert_eq!(c.month(364), (2025, 12));
        assert_eq!(c.month(365), (2026, 1));
    }

    #[test]
    fn day_type_matching() {
        assert!(DayType::All.matches(DayKind::Weekend));
        assert!(DayType::Weekdays.matches(DayKind::Weekday));
        assert!(!DayType::Weekdays.matches(DayKind::Weekend));
        assert!(DayType::Weekends.matches(DayKind::Weekend));
        assert!(!DayType::Weekends.matches(DayKind::Weekday));
    }
}
