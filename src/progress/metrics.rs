//! Progress metrics derived from an exercise's history
//!
//! Every function here is a read-only fold over a history slice in
//! insertion order. Chronological order is a stable sort by timestamp:
//! records logged at the same instant keep their insertion order, and the
//! later insertion counts as the more recent one.

use chrono::{DateTime, Utc};

use crate::exercises::{Exercise, MetricType};
use crate::workout::WorkoutRecord;

/// Days without a session before suggesting a harder variation
pub const DEFAULT_STALE_DAYS: i64 = 7;

const SECS_PER_DAY: i64 = 86_400;

/// Latest tracked value against the first tracked value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub current: f64,
    pub previous: f64,
}

impl Comparison {
    pub fn percent_change(&self) -> f64 {
        percent_change(self.current, self.previous)
    }
}

/// Change of the primary value against the immediately preceding record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Same,
    Undefined,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Same => "=",
            Direction::Undefined => " ",
        }
    }
}

/// History sorted by timestamp, ties in insertion order
pub fn chronological(history: &[WorkoutRecord]) -> Vec<&WorkoutRecord> {
    let mut sorted: Vec<_> = history.iter().collect();
    sorted.sort_by_key(|r| r.logged_at);
    sorted
}

/// Most recent record, if any
pub fn latest(history: &[WorkoutRecord]) -> Option<&WorkoutRecord> {
    chronological(history).pop()
}

/// Latest vs. first tracked value. Needs two records carrying the primary
/// field; compares against the oldest one to show the trend since tracking
/// began.
pub fn current_and_previous(history: &[WorkoutRecord], kind: MetricType) -> Option<Comparison> {
    let tracked: Vec<f64> = chronological(history)
        .into_iter()
        .filter_map(|r| r.primary_value(kind))
        .collect();

    if tracked.len() < 2 {
        return None;
    }

    Some(Comparison {
        current: *tracked.last()?,
        previous: *tracked.first()?,
    })
}

/// Percent change from `previous` to `current`; 0 when `previous` is 0
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Whole days elapsed since the latest record, None if never logged
pub fn days_since_last_use(history: &[WorkoutRecord], as_of: DateTime<Utc>) -> Option<i64> {
    let last = latest(history)?;
    let elapsed = (as_of - last.logged_at).num_seconds();
    Some(elapsed.div_euclid(SECS_PER_DAY))
}

pub fn needs_increase(days_since: i64, threshold: i64) -> bool {
    days_since >= threshold
}

/// Best primary value across the history
pub fn personal_record(history: &[WorkoutRecord], kind: MetricType) -> Option<f64> {
    history
        .iter()
        .filter_map(|r| r.primary_value(kind))
        .reduce(f64::max)
}

/// True if `record` strictly beats every other record in `history`.
/// A tie is not a new record; a first entry always is.
pub fn is_new_record(record: &WorkoutRecord, history: &[WorkoutRecord], kind: MetricType) -> bool {
    let others: Vec<_> = history.iter().filter(|r| r.id != record.id).collect();
    if others.is_empty() {
        return true;
    }

    let Some(value) = record.primary_value(kind) else {
        return false;
    };

    match others.iter().filter_map(|r| r.primary_value(kind)).reduce(f64::max) {
        Some(best) => value > best,
        None => true,
    }
}

/// Record immediately before `record` in chronological order
pub fn preceding<'a>(
    history: &'a [WorkoutRecord],
    record: &WorkoutRecord,
) -> Option<&'a WorkoutRecord> {
    let sorted = chronological(history);
    let pos = sorted.iter().position(|r| r.id == record.id)?;
    pos.checked_sub(1).map(|i| sorted[i])
}

/// Adjacent-pair comparison against the preceding record
pub fn direction_vs_previous(
    record: &WorkoutRecord,
    preceding: Option<&WorkoutRecord>,
    kind: MetricType,
) -> Direction {
    let Some(preceding) = preceding else {
        return Direction::Undefined;
    };

    match (record.primary_value(kind), preceding.primary_value(kind)) {
        (Some(current), Some(before)) => {
            if current > before {
                Direction::Up
            } else if current < before {
                Direction::Down
            } else {
                Direction::Same
            }
        }
        _ => Direction::Undefined,
    }
}

/// Everything the views show about one exercise
#[derive(Debug, Clone)]
pub struct ExerciseProgress<'a> {
    pub exercise: &'a Exercise,
    pub current: Option<&'a WorkoutRecord>,
    pub personal_record: Option<f64>,
    pub comparison: Option<Comparison>,
    pub days_since: Option<i64>,
    pub needs_increase: bool,
    pub sessions: usize,
}

impl<'a> ExerciseProgress<'a> {
    pub fn derive(
        exercise: &'a Exercise,
        history: &'a [WorkoutRecord],
        as_of: DateTime<Utc>,
        stale_days: i64,
    ) -> Self {
        let days_since = days_since_last_use(history, as_of);
        Self {
            exercise,
            current: latest(history),
            personal_record: personal_record(history, exercise.kind),
            comparison: current_and_previous(history, exercise.kind),
            days_since,
            needs_increase: days_since.is_some_and(|d| needs_increase(d, stale_days)),
            sessions: history.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::{Band, Payload, RecordId};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap()
    }

    fn weighted(id: u64, day: i64, weight: Option<f64>) -> WorkoutRecord {
        WorkoutRecord {
            id: RecordId(id),
            logged_at: base_time() + Duration::days(day),
            payload: Payload::Weighted { weight, reps: 5, sets: 3 },
        }
    }

    fn bodyweight(id: u64, day: i64, reps: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: RecordId(id),
            logged_at: base_time() + Duration::days(day),
            payload: Payload::Bodyweight { reps, sets: 3, band: Band::None },
        }
    }

    fn timed(id: u64, day: i64, seconds: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: RecordId(id),
            logged_at: base_time() + Duration::days(day),
            payload: Payload::Timed { seconds },
        }
    }

    fn weights(values: &[f64]) -> Vec<WorkoutRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, w)| weighted(i as u64, i as i64, Some(*w)))
            .collect()
    }

    #[rstest]
    #[case(60.0, 50.0, 20.0)]
    #[case(50.0, 100.0, -50.0)]
    #[case(10.0, 10.0, 0.0)]
    #[case(42.0, 0.0, 0.0)]
    #[case(0.0, 0.0, 0.0)]
    #[case(-5.0, 0.0, 0.0)]
    fn test_percent_change(#[case] current: f64, #[case] previous: f64, #[case] expected: f64) {
        assert!((percent_change(current, previous) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_current_and_previous_needs_two_tracked() {
        assert_eq!(current_and_previous(&[], MetricType::Weighted), None);
        assert_eq!(current_and_previous(&weights(&[80.0]), MetricType::Weighted), None);

        let history = vec![weighted(1, 0, None), weighted(2, 1, Some(80.0)), weighted(3, 2, None)];
        assert_eq!(current_and_previous(&history, MetricType::Weighted), None);
    }

    #[test]
    fn test_current_and_previous_compares_first_and_latest() {
        let history = weights(&[50.0, 80.0, 60.0]);
        let cmp = current_and_previous(&history, MetricType::Weighted).unwrap();
        assert_eq!(cmp, Comparison { current: 60.0, previous: 50.0 });
        assert!((cmp.percent_change() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_current_and_previous_skips_untracked() {
        let history = vec![
            weighted(1, 0, None),
            weighted(2, 1, Some(40.0)),
            weighted(3, 2, Some(50.0)),
            weighted(4, 3, None),
        ];
        let cmp = current_and_previous(&history, MetricType::Weighted).unwrap();
        assert_eq!(cmp, Comparison { current: 50.0, previous: 40.0 });
    }

    #[test]
    fn test_current_and_previous_uses_timestamps_not_insertion() {
        // Backdated entry inserted last
        let history = vec![
            weighted(1, 5, Some(70.0)),
            weighted(2, 9, Some(90.0)),
            weighted(3, 1, Some(60.0)),
        ];
        let cmp = current_and_previous(&history, MetricType::Weighted).unwrap();
        assert_eq!(cmp, Comparison { current: 90.0, previous: 60.0 });
    }

    #[test]
    fn test_days_since_last_use() {
        let history = vec![weighted(1, 0, Some(100.0)), weighted(2, 2, Some(100.0))];
        let last = base_time() + Duration::days(2);
        assert_eq!(days_since_last_use(&history, last), Some(0));
        assert_eq!(days_since_last_use(&history, last + Duration::hours(23)), Some(0));
        assert_eq!(days_since_last_use(&history, last + Duration::hours(49)), Some(2));
        assert_eq!(days_since_last_use(&[], last), None);
    }

    #[test]
    fn test_days_since_last_use_floors_future_timestamp() {
        let history = vec![weighted(1, 1, Some(100.0))];
        let as_of = base_time() + Duration::hours(12);
        assert_eq!(days_since_last_use(&history, as_of), Some(-1));
    }

    #[rstest]
    #[case(6, false)]
    #[case(7, true)]
    #[case(30, true)]
    fn test_needs_increase(#[case] days: i64, #[case] expected: bool) {
        assert_eq!(needs_increase(days, DEFAULT_STALE_DAYS), expected);
    }

    #[test]
    fn test_personal_record_is_max() {
        let values = [72.5, 80.0, 77.5, 80.0, 65.0];
        let history = weights(&values);
        let pr = personal_record(&history, MetricType::Weighted).unwrap();
        assert_eq!(pr, 80.0);
        for record in &history {
            assert!(pr >= record.primary_value(MetricType::Weighted).unwrap());
        }
    }

    #[test]
    fn test_personal_record_per_type() {
        let history = vec![bodyweight(1, 0, 8), bodyweight(2, 1, 12), bodyweight(3, 2, 10)];
        assert_eq!(personal_record(&history, MetricType::Bodyweight), Some(12.0));

        let history = vec![timed(1, 0, 45), timed(2, 1, 30)];
        assert_eq!(personal_record(&history, MetricType::Timed), Some(45.0));
    }

    #[test]
    fn test_personal_record_none_without_field() {
        let history = vec![weighted(1, 0, None), weighted(2, 1, None)];
        assert_eq!(personal_record(&history, MetricType::Weighted), None);
        assert_eq!(personal_record(&[], MetricType::Timed), None);
    }

    #[test]
    fn test_is_new_record_tie_is_not_record() {
        let history = weights(&[100.0, 100.0]);
        assert!(!is_new_record(&history[1], &history, MetricType::Weighted));
    }

    #[test]
    fn test_is_new_record_strictly_greater() {
        let history = weights(&[100.0, 90.0, 101.0]);
        assert!(is_new_record(&history[2], &history, MetricType::Weighted));
        assert!(!is_new_record(&history[1], &history, MetricType::Weighted));
    }

    #[test]
    fn test_is_new_record_empty_comparison() {
        let only = weighted(1, 0, Some(20.0));
        assert!(is_new_record(&only, std::slice::from_ref(&only), MetricType::Weighted));
        assert!(is_new_record(&only, &[], MetricType::Weighted));

        let untracked = weighted(2, 0, None);
        assert!(is_new_record(&untracked, std::slice::from_ref(&untracked), MetricType::Weighted));
    }

    #[test]
    fn test_is_new_record_sparse_history() {
        let history = vec![weighted(1, 0, None), weighted(2, 1, Some(50.0))];
        assert!(is_new_record(&history[1], &history, MetricType::Weighted));
        assert!(!is_new_record(&history[0], &history, MetricType::Weighted));
    }

    #[test]
    fn test_direction_vs_previous() {
        let history = weights(&[50.0, 80.0, 80.0, 60.0]);
        let kind = MetricType::Weighted;
        let dir =
            |i: usize| direction_vs_previous(&history[i], preceding(&history, &history[i]), kind);
        assert_eq!(dir(0), Direction::Undefined);
        assert_eq!(dir(1), Direction::Up);
        assert_eq!(dir(2), Direction::Same);
        assert_eq!(dir(3), Direction::Down);
    }

    #[test]
    fn test_direction_undefined_on_missing_field() {
        let history = vec![weighted(1, 0, None), weighted(2, 1, Some(50.0))];
        let dir = direction_vs_previous(&history[1], Some(&history[0]), MetricType::Weighted);
        assert_eq!(dir, Direction::Undefined);
    }

    #[test]
    fn test_first_vs_latest_and_adjacent_disagree() {
        let history = weights(&[50.0, 80.0, 60.0]);
        let kind = MetricType::Weighted;

        let cmp = current_and_previous(&history, kind).unwrap();
        assert_eq!((cmp.current, cmp.previous), (60.0, 50.0));
        assert!(cmp.percent_change() > 0.0);

        let last = latest(&history).unwrap();
        let prev = preceding(&history, last);
        assert_eq!(prev.map(|r| r.id), Some(RecordId(1)));
        assert_eq!(direction_vs_previous(last, prev, kind), Direction::Down);
    }

    #[test]
    fn test_preceding_same_timestamp_uses_insertion_order() {
        let mut history = weights(&[40.0, 45.0]);
        history[1].logged_at = history[0].logged_at;
        assert_eq!(preceding(&history, &history[1]).map(|r| r.id), Some(RecordId(0)));
        assert_eq!(latest(&history).map(|r| r.id), Some(RecordId(1)));
    }

    #[test]
    fn test_exercise_progress_derive() {
        let exercise = Exercise {
            id: crate::exercises::ExerciseId(0),
            name: "Plank".to_string(),
            category: "Core".to_string(),
            kind: MetricType::Timed,
            icon: "🎯".to_string(),
        };
        let history = vec![timed(1, 0, 30), timed(2, 1, 60), timed(3, 2, 45)];
        let as_of = base_time() + Duration::days(10);

        let progress = ExerciseProgress::derive(&exercise, &history, as_of, DEFAULT_STALE_DAYS);
        assert_eq!(progress.current.map(|r| r.id), Some(RecordId(3)));
        assert_eq!(progress.personal_record, Some(60.0));
        assert_eq!(progress.comparison, Some(Comparison { current: 45.0, previous: 30.0 }));
        assert_eq!(progress.days_since, Some(8));
        assert!(progress.needs_increase);
        assert_eq!(progress.sessions, 3);
    }
}
