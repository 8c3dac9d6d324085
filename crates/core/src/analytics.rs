//! Rolling signup analytics: the daily cumulative series and weekly growth.
//!
//! Day boundaries are UTC calendar days. The series covers the last
//! `window_days` days ending today, inclusive, and always has exactly
//! `window_days` rows.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::types::Timestamp;

/// Default length of the daily series.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Length of one growth comparison period.
pub const GROWTH_PERIOD_DAYS: i64 = 7;

/// The calendar window covered by a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesWindow {
    /// First day of the series (oldest row).
    pub first_day: NaiveDate,
    /// Last day of the series (today).
    pub last_day: NaiveDate,
    /// Midnight UTC at the start of `first_day`. Signups before this instant
    /// form the baseline.
    pub start: Timestamp,
}

impl SeriesWindow {
    /// Window of `window_days` days ending on the UTC date of `now`.
    ///
    /// A zero-day window is widened to one day.
    pub fn ending_at(now: Timestamp, window_days: u32) -> Self {
        let days = i64::from(window_days.max(1));
        let last_day = now.date_naive();
        let first_day = last_day - Duration::days(days - 1);
        let start = first_day.and_time(chrono::NaiveTime::MIN).and_utc();
        Self {
            first_day,
            last_day,
            start,
        }
    }

    /// Days in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day.iter_days().take_while({
            let last = self.last_day;
            move |d| *d <= last
        })
    }
}

/// One row of the daily series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// Short display label, e.g. `Mar 04`.
    pub date: String,
    /// ISO calendar date, e.g. `2025-03-04`.
    pub full_date: NaiveDate,
    /// Signups created on this day.
    pub signups: i64,
    /// Running total including the pre-window baseline.
    pub total_signups: i64,
}

/// Build the zero-filled cumulative series.
///
/// `baseline` is the number of signups created before `window.start`;
/// `daily_counts` maps each day to its signup count (days without signups
/// may be absent).
pub fn daily_series(
    window: &SeriesWindow,
    baseline: i64,
    daily_counts: &HashMap<NaiveDate, i64>,
) -> Vec<DailyPoint> {
    let mut total = baseline;
    window
        .days()
        .map(|day| {
            let signups = daily_counts.get(&day).copied().unwrap_or(0);
            total += signups;
            DailyPoint {
                date: day.format("%b %d").to_string(),
                full_date: day,
                signups,
                total_signups: total,
            }
        })
        .collect()
}

/// Boundaries of the current and previous growth periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthWindows {
    /// `now - 7d`: start of the current period (inclusive).
    pub current_start: Timestamp,
    /// `now - 14d`: start of the previous period (inclusive); it ends at
    /// `current_start` (exclusive).
    pub previous_start: Timestamp,
}

impl GrowthWindows {
    pub fn ending_at(now: Timestamp) -> Self {
        Self {
            current_start: now - Duration::days(GROWTH_PERIOD_DAYS),
            previous_start: now - Duration::days(GROWTH_PERIOD_DAYS * 2),
        }
    }
}

/// Headline numbers shown next to the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupMetrics {
    pub total_signups: i64,
    #[serde(rename = "last7DaysSignups")]
    pub last_7_days_signups: i64,
    pub previous_week_signups: i64,
    pub weekly_growth: f64,
}

impl SignupMetrics {
    pub fn new(total_signups: i64, last_7_days_signups: i64, previous_week_signups: i64) -> Self {
        Self {
            total_signups,
            last_7_days_signups,
            previous_week_signups,
            weekly_growth: weekly_growth_percent(last_7_days_signups, previous_week_signups),
        }
    }
}

/// Week-over-week growth in percent, rounded to two decimals.
///
/// With no signups in the previous week the result is `0` when the current
/// week is also empty and a flat `100` otherwise.
pub fn weekly_growth_percent(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    let growth = (current - previous) as f64 / previous as f64 * 100.0;
    (growth * 100.0).round() / 100.0
}
