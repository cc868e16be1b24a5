//! Calendar-indexed daily series.

use chrono::{Days, NaiveDate};

/// Ordered-by-date mapping from calendar day to a single value in a canonical
/// unit. Gap-free and strictly chronological by construction; treated as
/// immutable once returned by the builder.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    start: NaiveDate,
    values: Vec<f64>,
}

impl DailySeries {
    /// Build from consecutive daily values beginning at `start`. The crate
    /// only constructs series through the builder, which guarantees one value
    /// per day with no gaps.
    pub(crate) fn from_values(start: NaiveDate, values: Vec<f64>) -> Self {
        DailySeries { start, values }
    }

    /// First calendar day of the series.
    #[must_use]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last calendar day of the series.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.start + Days::new(self.values.len() as u64 - 1)
    }

    /// Number of days covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series covers no days at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value on a given calendar day, if covered.
    #[must_use]
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        let offset = date.signed_duration_since(self.start).num_days();
        if offset < 0 {
            return None;
        }
        self.values.get(usize::try_from(offset).ok()?).copied()
    }

    /// Iterate `(date, value)` pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (self.start + Days::new(i as u64), v))
    }

    /// All values in chronological order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lookup_and_bounds() {
        let series = DailySeries::from_values(day(2020, 7, 21), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.start(), day(2020, 7, 21));
        assert_eq!(series.end(), day(2020, 7, 23));
        assert_eq!(series.value_on(day(2020, 7, 22)), Some(2.0));
        assert_eq!(series.value_on(day(2020, 7, 24)), None);
        assert_eq!(series.value_on(day(2020, 7, 20)), None);
    }

    #[test]
    fn iteration_is_chronological_and_gap_free() {
        let series = DailySeries::from_values(day(2020, 12, 30), vec![5.0, 6.0, 7.0]);
        let dates: Vec<NaiveDate> = series.iter().map(|(d, _)| d).collect();
        assert_eq!(
            dates,
            vec![day(2020, 12, 30), day(2020, 12, 31), day(2021, 1, 1)]
        );
    }
}
