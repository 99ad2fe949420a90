//! Rate snapshots and historical series.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::CurrencyCode;
use crate::error::RateError;

/// Longest inclusive span the upstream provider returns at daily granularity.
pub const MAX_UPSTREAM_SPAN_DAYS: u64 = 90;

/// Rates for one day, keyed by quote currency.
pub type DailyRates = BTreeMap<CurrencyCode, Decimal>;

/// Daily rates keyed by publication date, in chronological order.
pub type RateSeries = BTreeMap<NaiveDate, DailyRates>;

/// All rates for one base currency at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RateSnapshot {
    /// Base currency the rates are quoted against
    pub base: CurrencyCode,
    /// Publication date of the rates
    #[serde(rename = "date")]
    #[schema(value_type = String, example = "2024-09-06")]
    pub as_of: NaiveDate,
    /// Units of each quote currency per one unit of `base`
    #[schema(value_type = Object, example = json!({"AUD": "1.4864", "BGN": "1.7615"}))]
    pub rates: DailyRates,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    #[schema(value_type = String, example = "2024-01-01")]
    pub start: NaiveDate,
    #[schema(value_type = String, example = "2024-03-30")]
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates an inclusive range. `start` may equal `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RateError> {
        if start > end {
            return Err(RateError::InvalidRange {
                from: start,
                to: end,
            });
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Splits the range into contiguous, non-overlapping chunks of at most
    /// `max_days` days each, in ascending order.
    pub fn chunks(&self, max_days: u64) -> Vec<DateRange> {
        let max_days = max_days.max(1);
        let count = self.days().div_ceil(max_days);

        (0..count)
            .filter_map(|i| {
                let start = self.start.checked_add_days(Days::new(i * max_days))?;
                let end = start
                    .checked_add_days(Days::new(max_days - 1))
                    .map_or(self.end, |end| end.min(self.end));
                Some(DateRange { start, end })
            })
            .collect()
    }
}

/// Daily rates for one base currency over a requested window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoricalSeries {
    pub base: CurrencyCode,
    #[schema(value_type = String, example = "2024-07-08")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2024-07-10")]
    pub end_date: NaiveDate,
    #[schema(value_type = Object)]
    pub rates: RateSeries,
    /// Sub-ranges whose upstream fetch failed and are missing from `rates`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_ranges: Vec<DateRange>,
}

impl HistoricalSeries {
    /// Creates an empty series covering `range`.
    pub fn empty(base: CurrencyCode, range: DateRange) -> Self {
        Self {
            base,
            start_date: range.start,
            end_date: range.end,
            rates: RateSeries::new(),
            skipped_ranges: Vec::new(),
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    /// Number of published dates.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// True when no sub-range was dropped while assembling the series.
    pub fn is_complete(&self) -> bool {
        self.skipped_ranges.is_empty()
    }

    /// Inserts every date of `other` that is inside this series' bounds and
    /// not already present. Returns the number of dates added.
    pub fn merge_first_seen(&mut self, other: &RateSeries) -> usize {
        let bounds = self.range();
        let mut added = 0;
        for (date, rates) in other {
            if !bounds.contains(*date) {
                continue;
            }
            if let std::collections::btree_map::Entry::Vacant(slot) = self.rates.entry(*date) {
                slot.insert(rates.clone());
                added += 1;
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn usd() -> CurrencyCode {
        "USD".parse().unwrap()
    }

    fn day(aud: Decimal) -> DailyRates {
        DailyRates::from([("AUD".parse().unwrap(), aud)])
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        let result = DateRange::new(date("2024-02-01"), date("2024-01-01"));
        assert!(matches!(result, Err(RateError::InvalidRange { .. })));
    }

    #[test]
    fn test_range_days_inclusive() {
        let range = DateRange::new(date("2024-01-01"), date("2024-01-01")).unwrap();
        assert_eq!(range.days(), 1);
        let range = DateRange::new(date("2024-01-01"), date("2024-03-31")).unwrap();
        assert_eq!(range.days(), 91);
    }

    #[test]
    fn test_short_range_is_single_chunk() {
        let range = DateRange::new(date("2024-01-01"), date("2024-03-30")).unwrap();
        assert_eq!(range.days(), 90);
        assert_eq!(range.chunks(MAX_UPSTREAM_SPAN_DAYS), vec![range]);
    }

    #[test]
    fn test_chunks_are_contiguous_and_cover_range() {
        let range = DateRange::new(date("2023-01-01"), date("2023-12-31")).unwrap();
        let chunks = range.chunks(MAX_UPSTREAM_SPAN_DAYS);

        assert_eq!(chunks.len(), 5); // ceil(365 / 90)
        assert_eq!(chunks[0].start, range.start);
        assert_eq!(chunks.last().unwrap().end, range.end);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
        }
        for chunk in &chunks[..chunks.len() - 1] {
            assert_eq!(chunk.days(), 90);
        }
        let covered: u64 = chunks.iter().map(DateRange::days).sum();
        assert_eq!(covered, range.days());
    }

    #[test]
    fn test_trailing_single_day_chunk() {
        let range = DateRange::new(date("2024-01-01"), date("2024-03-31")).unwrap();
        let chunks = range.chunks(MAX_UPSTREAM_SPAN_DAYS);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].start, date("2024-03-31"));
        assert_eq!(chunks[1].end, date("2024-03-31"));
    }

    #[test]
    fn test_merge_keeps_first_seen_and_bounds() {
        let range = DateRange::new(date("2024-07-08"), date("2024-07-10")).unwrap();
        let mut series = HistoricalSeries::empty(usd(), range);

        let first = RateSeries::from([
            (date("2024-07-05"), day(dec!(1.40))),
            (date("2024-07-08"), day(dec!(1.48))),
        ]);
        let second = RateSeries::from([
            (date("2024-07-08"), day(dec!(9.99))),
            (date("2024-07-10"), day(dec!(1.49))),
        ]);

        assert_eq!(series.merge_first_seen(&first), 1);
        assert_eq!(series.merge_first_seen(&second), 1);

        assert_eq!(series.len(), 2);
        assert!(!series.rates.contains_key(&date("2024-07-05")));
        assert_eq!(series.rates[&date("2024-07-08")], day(dec!(1.48)));
    }

    #[test]
    fn test_snapshot_deserializes_upstream_numbers() {
        let body = r#"{"base":"USD","date":"2024-09-06","rates":{"AUD":1.4864,"BGN":1.7615}}"#;
        let snapshot: RateSnapshot = serde_json::from_str(body).unwrap();

        assert_eq!(snapshot.as_of, date("2024-09-06"));
        assert_eq!(snapshot.rates[&"AUD".parse().unwrap()], dec!(1.4864));
    }
}
