use crate::models::{
    DailyLog, Document, MetricProgress, StatsResponse, TodayMetrics, WeeklyAveragePoint,
    WeeklySummary,
};
use chrono::{Datelike, Days, Local, NaiveDate};
use std::collections::HashSet;

pub const DEFAULT_WINDOW: usize = 7;
const WEEK_COUNT: usize = 4;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Stats for the window ending at `reference`. Returns `None` when the window
/// or the weekly chart would reach past the calendar range `NaiveDate` covers.
pub fn build_stats_at(
    reference: NaiveDate,
    window: usize,
    document: &Document,
) -> Option<StatsResponse> {
    let lookback = window.max(7 * WEEK_COUNT) as u64;
    reference.checked_sub_days(Days::new(lookback))?;
    reference.checked_add_days(Days::new(7))?;

    let days = last_n_days(document, window, reference);
    Some(StatsResponse {
        reference_date: date_key(reference),
        summary: weekly_summary(&days),
        today: today_metrics(document, reference),
        current_streak: consecutive_streak(&document.daily_logs, reference),
        weekly_averages: weekly_averages(document, reference),
        days,
    })
}

/// One entry per calendar day of the `n` days ending at `reference`, oldest
/// first. Days without a stored log get [`DailyLog::placeholder`]. Days
/// before the earliest representable date are left out.
pub fn last_n_days(document: &Document, n: usize, reference: NaiveDate) -> Vec<DailyLog> {
    (0..n as u64)
        .rev()
        .filter_map(|offset| reference.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let key = date_key(date);
            find_log(&document.daily_logs, &key)
                .cloned()
                .unwrap_or_else(|| DailyLog::placeholder(key))
        })
        .collect()
}

pub fn find_log<'a>(logs: &'a [DailyLog], date: &str) -> Option<&'a DailyLog> {
    logs.iter().find(|log| log.date == date)
}

pub fn weekly_summary(days: &[DailyLog]) -> WeeklySummary {
    WeeklySummary {
        days: days.len(),
        avg_deep_work_hours: mean(days.iter().map(|log| log.deep_work_hours)),
        avg_phone_screen_time: mean(days.iter().map(|log| log.phone_screen_time)),
        avg_sleep_hours: mean(days.iter().map(|log| log.sleep_hours)),
        avg_mood_score: mean(days.iter().map(|log| log.mood_score)),
        exercise_days: days.iter().filter(|log| log.exercise_done).count(),
        meditation_days: days.iter().filter(|log| log.meditation_done).count(),
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

/// Number of consecutive logged days ending at `reference`. A day that has not
/// been logged yet does not break the streak; counting then starts from the
/// day before.
///
/// This is the real streak. The profile's `streak_count` keeps the plain log
/// count and is not derived from this.
pub fn consecutive_streak(logs: &[DailyLog], reference: NaiveDate) -> usize {
    let dates: HashSet<&str> = logs.iter().map(|log| log.date.as_str()).collect();
    let mut day = if dates.contains(date_key(reference).as_str()) {
        Some(reference)
    } else {
        reference.pred_opt()
    };

    let mut streak = 0;
    while let Some(current) = day.filter(|d| dates.contains(date_key(*d).as_str())) {
        streak += 1;
        day = current.pred_opt();
    }
    streak
}

pub fn today_metrics(document: &Document, reference: NaiveDate) -> TodayMetrics {
    let key = date_key(reference);
    let log = find_log(&document.daily_logs, &key);
    let targets = &document.daily_targets;
    let entry = log.cloned().unwrap_or_else(|| DailyLog {
        mood_score: 0.0,
        ..DailyLog::placeholder(key.clone())
    });

    TodayMetrics {
        date: key,
        logged: log.is_some(),
        deep_work: progress(entry.deep_work_hours, targets.deep_work_hours),
        screen_time: progress(entry.phone_screen_time, targets.phone_screen_time),
        exercise_done: entry.exercise_done,
        exercise_type: entry.exercise_type,
        sleep_hours: entry.sleep_hours,
        sleep_quality: entry.sleep_quality,
        meditation_done: entry.meditation_done,
    }
}

fn progress(value: f64, target: f64) -> MetricProgress {
    let ratio = if target > 0.0 { value / target } else { 0.0 };
    MetricProgress {
        value,
        target,
        ratio: ratio.clamp(0.0, 1.0),
        over_target: value > target,
    }
}

/// Per-day averages for the last few calendar weeks (Monday start). Days not
/// yet reached in the current week are left out of the denominator.
pub fn weekly_averages(document: &Document, reference: NaiveDate) -> Vec<WeeklyAveragePoint> {
    let Some(current_week_start) = week_start(reference) else {
        return Vec::new();
    };
    let mut points = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT as u64).rev() {
        let Some(start) = current_week_start.checked_sub_days(Days::new(7 * offset)) else {
            continue;
        };
        let Some(end) = start.checked_add_days(Days::new(6)) else {
            continue;
        };

        let mut deep_work_sum = 0.0;
        let mut sleep_sum = 0.0;
        for date in start.iter_days().take(7) {
            if let Some(log) = find_log(&document.daily_logs, &date_key(date)) {
                deep_work_sum += log.deep_work_hours;
                sleep_sum += log.sleep_hours;
            }
        }

        let days_counted = if reference < start {
            0
        } else if reference > end {
            7
        } else {
            (reference - start).num_days() as u8 + 1
        };
        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        points.push(WeeklyAveragePoint {
            week: week_label(start),
            start_date: date_key(start),
            end_date: date_key(end),
            days_counted,
            avg_deep_work_hours: deep_work_sum / denom,
            avg_sleep_hours: sleep_sum / denom,
        });
    }

    points
}

/// Picks a quote that stays fixed for the whole calendar day.
pub fn quote_of_the_day(quotes: &[String], date: NaiveDate) -> Option<&str> {
    if quotes.is_empty() {
        return None;
    }
    let index = date.ordinal0() as usize % quotes.len();
    Some(quotes[index].as_str())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::initial_document;

    fn log(date: &str, deep_work: f64, sleep: f64) -> DailyLog {
        DailyLog {
            deep_work_hours: deep_work,
            sleep_hours: sleep,
            mood_score: 7.0,
            ..DailyLog::placeholder(date)
        }
    }

    fn document_with(logs: Vec<DailyLog>) -> Document {
        let mut doc = initial_document("Tester", "2026-01-01").unwrap();
        doc.daily_logs = logs;
        doc
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_n_days_fills_gaps_oldest_first() {
        let doc = document_with(vec![log("2026-01-05", 2.0, 7.0), log("2026-01-03", 4.0, 8.0)]);
        let days = last_n_days(&doc, 7, day(2026, 1, 5));

        assert_eq!(days.len(), 7);
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(
            dates,
            [
                "2025-12-30",
                "2025-12-31",
                "2026-01-01",
                "2026-01-02",
                "2026-01-03",
                "2026-01-04",
                "2026-01-05"
            ]
        );
        assert_eq!(days[4].deep_work_hours, 4.0);
        assert_eq!(days[6].deep_work_hours, 2.0);
        assert_eq!(days[0], DailyLog::placeholder("2025-12-30"));
        assert_eq!(days[0].mood_score, 5.0);
    }

    #[test]
    fn last_n_days_honours_window_size() {
        let doc = document_with(Vec::new());
        assert_eq!(last_n_days(&doc, 14, day(2026, 3, 1)).len(), 14);
        assert!(last_n_days(&doc, 0, day(2026, 3, 1)).is_empty());
    }

    #[test]
    fn weekly_summary_averages_over_full_window() {
        let mut exercised = log("2026-01-04", 3.0, 7.0);
        exercised.exercise_done = true;
        let doc = document_with(vec![exercised, log("2026-01-05", 4.0, 7.0)]);
        let summary = weekly_summary(&last_n_days(&doc, 7, day(2026, 1, 5)));

        assert_eq!(summary.days, 7);
        assert!((summary.avg_deep_work_hours - 1.0).abs() < 1e-9);
        assert!((summary.avg_sleep_hours - 2.0).abs() < 1e-9);
        assert_eq!(summary.exercise_days, 1);
        // five placeholders at 5 plus two logged days at 7
        assert!((summary.avg_mood_score - 39.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_summary_of_nothing_is_zero() {
        let summary = weekly_summary(&[]);
        assert_eq!(summary.avg_deep_work_hours, 0.0);
        assert_eq!(summary.exercise_days, 0);
    }

    #[test]
    fn consecutive_streak_stops_at_gap() {
        let logs = vec![
            log("2026-01-01", 1.0, 7.0),
            log("2026-01-03", 1.0, 7.0),
            log("2026-01-04", 1.0, 7.0),
            log("2026-01-05", 1.0, 7.0),
        ];
        assert_eq!(consecutive_streak(&logs, day(2026, 1, 5)), 3);
        // today not logged yet: streak carries over from yesterday
        assert_eq!(consecutive_streak(&logs, day(2026, 1, 6)), 3);
        assert_eq!(consecutive_streak(&logs, day(2026, 1, 8)), 0);
        assert_eq!(consecutive_streak(&[], day(2026, 1, 8)), 0);
    }

    #[test]
    fn today_metrics_reports_progress_against_targets() {
        let mut today_log = log("2026-01-05", 1.5, 6.0);
        today_log.phone_screen_time = 2.0;
        let doc = document_with(vec![today_log]);
        let metrics = today_metrics(&doc, day(2026, 1, 5));

        assert!(metrics.logged);
        assert!((metrics.deep_work.ratio - 0.5).abs() < 1e-9);
        assert!(!metrics.deep_work.over_target);
        assert_eq!(metrics.screen_time.ratio, 1.0);
        assert!(metrics.screen_time.over_target);

        let empty = today_metrics(&doc, day(2026, 1, 6));
        assert!(!empty.logged);
        assert_eq!(empty.deep_work.value, 0.0);
    }

    #[test]
    fn weekly_averages_use_days_so_far() {
        // 2026-01-07 is a Wednesday
        let doc = document_with(vec![log("2026-01-05", 3.0, 6.0), log("2026-01-06", 3.0, 9.0)]);
        let weeks = weekly_averages(&doc, day(2026, 1, 7));

        assert_eq!(weeks.len(), 4);
        let current = weeks.last().unwrap();
        assert_eq!(current.start_date, "2026-01-05");
        assert_eq!(current.days_counted, 3);
        assert!((current.avg_deep_work_hours - 2.0).abs() < 1e-9);
        assert!((current.avg_sleep_hours - 5.0).abs() < 1e-9);
        assert_eq!(weeks[0].days_counted, 7);
    }

    #[test]
    fn calendar_edges_do_not_panic() {
        let doc = document_with(vec![log(&date_key(NaiveDate::MIN), 1.0, 7.0)]);

        assert!(build_stats_at(NaiveDate::MAX, 7, &doc).is_none());
        assert!(build_stats_at(NaiveDate::MIN, 7, &doc).is_none());
        let last_week_of_time = NaiveDate::MAX.checked_sub_days(Days::new(6)).unwrap();
        assert!(build_stats_at(last_week_of_time, 7, &doc).is_none());

        assert_eq!(last_n_days(&doc, 7, NaiveDate::MIN).len(), 1);
        assert_eq!(consecutive_streak(&doc.daily_logs, NaiveDate::MIN), 1);
        assert!(weekly_averages(&doc, NaiveDate::MAX).len() <= WEEK_COUNT);
    }

    #[test]
    fn build_stats_at_covers_the_window() {
        let doc = document_with(vec![log("2026-01-05", 2.0, 7.0)]);
        let stats = build_stats_at(day(2026, 1, 5), 10, &doc).expect("in range");

        assert_eq!(stats.reference_date, "2026-01-05");
        assert_eq!(stats.days.len(), 10);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.weekly_averages.len(), WEEK_COUNT);
    }

    #[test]
    fn quote_of_the_day_is_stable_per_day() {
        let quotes = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(quote_of_the_day(&quotes, day(2026, 1, 1)), Some("a"));
        assert_eq!(quote_of_the_day(&quotes, day(2026, 1, 2)), Some("b"));
        assert_eq!(quote_of_the_day(&quotes, day(2026, 1, 4)), Some("a"));
        assert_eq!(quote_of_the_day(&[], day(2026, 1, 4)), None);
    }
}
