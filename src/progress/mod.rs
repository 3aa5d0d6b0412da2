//! Progress module - derived metrics and logbook statistics
//!
//! Features:
//! - Current value, personal records and trend per exercise
//! - Days since last session and the "needs increase" flag
//! - Aggregated stats over the whole log

pub mod metrics;

pub use metrics::{Comparison, Direction, ExerciseProgress};

use crate::workout::WorkoutRecord;

/// Aggregated statistics over every logged session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Total number of logged sessions
    pub total_sessions: usize,
    /// Exercises with at least one session
    pub exercises_used: usize,
    /// Sum of weight * reps * sets over weighted sessions
    pub total_volume: f64,
    /// Sessions per week between the first and last entry
    pub weekly_frequency: f64,
}

impl Summary {
    /// Build from one history slice per exercise
    pub fn from_histories<'a, I>(histories: I) -> Self
    where
        I: IntoIterator<Item = &'a [WorkoutRecord]>,
    {
        let mut summary = Summary::default();
        let mut first = None;
        let mut last = None;

        for history in histories {
            if history.is_empty() {
                continue;
            }
            summary.exercises_used += 1;
            summary.total_sessions += history.len();
            summary.total_volume += history.iter().filter_map(|r| r.payload.volume()).sum::<f64>();

            for record in history {
                let date = record.logged_at.date_naive();
                first = Some(first.map_or(date, |f: chrono::NaiveDate| f.min(date)));
                last = Some(last.map_or(date, |l: chrono::NaiveDate| l.max(date)));
            }
        }

        summary.weekly_frequency = match (first, last) {
            (Some(first), Some(last)) if summary.total_sessions >= 2 => {
                let days = (last - first).num_days() as f64;
                if days == 0.0 {
                    summary.total_sessions as f64
                } else {
                    summary.total_sessions as f64 / days * 7.0
                }
            }
            _ => 0.0,
        };

        summary
    }
}
