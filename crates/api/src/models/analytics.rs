//! Admin analytics types.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Trailing window for the admin analytics summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsRange {
    Week,
    #[default]
    Month,
    Year,
}

impl AnalyticsRange {
    /// Parse the `range` query parameter; anything unrecognized falls back
    /// to the month window.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("week") => Self::Week,
            Some("year") => Self::Year,
            _ => Self::Month,
        }
    }

    /// Start of the trailing window relative to `now`.
    #[must_use]
    pub fn start_from(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        };
        now - Duration::days(days)
    }
}

/// One analytics figure over a window.
///
/// `change` is always 0: the endpoint computes no period-over-period delta.
#[derive(Debug, Clone, Serialize)]
pub struct Metric<T> {
    pub total: T,
    pub period: AnalyticsRange,
    pub change: i64,
}

impl<T> Metric<T> {
    #[must_use]
    pub const fn new(total: T, period: AnalyticsRange) -> Self {
        Self {
            total,
            period,
            change: 0,
        }
    }
}

/// The full analytics summary payload.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub revenue: Metric<Decimal>,
    pub orders: Metric<i64>,
    pub customers: Metric<i64>,
    pub products: Metric<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_parsing_defaults_to_month() {
        assert_eq!(AnalyticsRange::from_query(Some("week")), AnalyticsRange::Week);
        assert_eq!(AnalyticsRange::from_query(Some("year")), AnalyticsRange::Year);
        assert_eq!(AnalyticsRange::from_query(Some("month")), AnalyticsRange::Month);
        assert_eq!(AnalyticsRange::from_query(Some("decade")), AnalyticsRange::Month);
        assert_eq!(AnalyticsRange::from_query(None), AnalyticsRange::Month);
    }

    #[test]
    fn test_window_starts() {
        let now = Utc::now();
        assert_eq!(AnalyticsRange::Week.start_from(now), now - Duration::days(7));
        assert_eq!(AnalyticsRange::Month.start_from(now), now - Duration::days(30));
        assert_eq!(AnalyticsRange::Year.start_from(now), now - Duration::days(365));
    }

    #[test]
    fn test_metric_change_is_hardcoded_zero() {
        let metric = Metric::new(Decimal::from(1200), AnalyticsRange::Week);
        assert_eq!(metric.change, 0);
    }
}
