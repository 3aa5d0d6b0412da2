//! Tracker - the catalog plus one insertion-ordered history per exercise

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::TrackerError;
use crate::exercises::{Catalog, Exercise, ExerciseId, MetricType};
use crate::progress::{ExerciseProgress, Summary};
use crate::progress::metrics;
use crate::workout::{Payload, RecordId, WorkoutRecord};

/// Default cap of the recent activity view
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// One row of the global recent activity view
#[derive(Debug, Clone, PartialEq)]
pub struct RecentEntry<'a> {
    pub exercise: &'a Exercise,
    pub record: &'a WorkoutRecord,
}

/// Owns every exercise and its history. Histories are keyed by exercise
/// id, so removing an exercise can never leave a record pointing nowhere.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    catalog: Catalog,
    histories: BTreeMap<ExerciseId, Vec<WorkoutRecord>>,
    next_record_id: u64,
}

impl Tracker {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            histories: BTreeMap::new(),
            next_record_id: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.catalog.by_id(id)
    }

    pub fn add_exercise(
        &mut self,
        name: &str,
        kind: MetricType,
        category: &str,
    ) -> Result<ExerciseId, TrackerError> {
        let id = self
            .catalog
            .add(name, kind, category)
            .ok_or(TrackerError::IdsExhausted("exercises"))?;
        debug!(%id, name, %kind, "exercise added");
        Ok(id)
    }

    /// Remove an exercise together with its whole history
    pub fn remove_exercise(&mut self, id: ExerciseId) -> Option<Exercise> {
        let exercise = self.catalog.remove(id)?;
        let dropped = self.histories.remove(&id).map_or(0, |h| h.len());
        debug!(%id, dropped, "exercise removed");
        Some(exercise)
    }

    /// Log a new record for an exercise
    pub fn append(
        &mut self,
        exercise_id: ExerciseId,
        logged_at: DateTime<Utc>,
        payload: Payload,
    ) -> Result<RecordId, TrackerError> {
        let exercise = self
            .catalog
            .by_id(exercise_id)
            .ok_or(TrackerError::UnknownExercise(exercise_id))?;

        if exercise.kind != payload.kind() {
            return Err(TrackerError::PayloadMismatch {
                expected: exercise.kind,
                found: payload.kind(),
            });
        }

        let id = RecordId(self.next_record_id);
        self.next_record_id = id
            .0
            .checked_add(1)
            .ok_or(TrackerError::IdsExhausted("entries"))?;
        self.histories.entry(exercise_id).or_default().push(WorkoutRecord {
            id,
            logged_at,
            payload,
        });
        debug!(exercise = %exercise_id, record = %id, "record appended");
        Ok(id)
    }

    /// Restore a record with its original id (snapshot loading). The caller
    /// keeps ids unique. Returns false for an unknown exercise, a payload of
    /// the wrong type or an id with no successor for the counter.
    pub(crate) fn restore(&mut self, exercise_id: ExerciseId, record: WorkoutRecord) -> bool {
        let Some(exercise) = self.catalog.by_id(exercise_id) else {
            return false;
        };
        let Some(next) = record.id.0.checked_add(1) else {
            return false;
        };
        if exercise.kind != record.payload.kind() {
            return false;
        }
        self.next_record_id = self.next_record_id.max(next);
        self.histories.entry(exercise_id).or_default().push(record);
        true
    }

    /// Delete one record; the remaining records keep their order
    pub fn remove(
        &mut self,
        exercise_id: ExerciseId,
        record_id: RecordId,
    ) -> Option<WorkoutRecord> {
        let history = self.histories.get_mut(&exercise_id)?;
        let pos = history.iter().position(|r| r.id == record_id)?;
        let removed = history.remove(pos);
        debug!(exercise = %exercise_id, record = %record_id, "record removed");
        Some(removed)
    }

    /// Find which exercise owns a record
    pub fn owner_of(&self, record_id: RecordId) -> Option<ExerciseId> {
        self.histories
            .iter()
            .find(|(_, h)| h.iter().any(|r| r.id == record_id))
            .map(|(id, _)| *id)
    }

    /// History of an exercise in insertion order; empty if unknown
    pub fn all_for(&self, exercise_id: ExerciseId) -> &[WorkoutRecord] {
        self.histories.get(&exercise_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Latest record of an exercise, recomputed from its history
    pub fn current(&self, exercise_id: ExerciseId) -> Option<&WorkoutRecord> {
        metrics::latest(self.all_for(exercise_id))
    }

    /// Records of every exercise, newest first, at most `limit`
    pub fn all_records(&self, limit: usize) -> Vec<RecentEntry<'_>> {
        let mut entries: Vec<RecentEntry<'_>> = self
            .histories
            .iter()
            .filter_map(|(id, history)| self.catalog.by_id(*id).map(|e| (e, history)))
            .flat_map(|(exercise, history)| {
                history.iter().map(move |record| RecentEntry { exercise, record })
            })
            .collect();

        // Ids grow with insertion, so they order same-instant entries
        entries.sort_by(|a, b| {
            b.record
                .logged_at
                .cmp(&a.record.logged_at)
                .then_with(|| b.record.id.cmp(&a.record.id))
        });
        entries.truncate(limit);
        entries
    }

    pub fn progress(
        &self,
        exercise_id: ExerciseId,
        as_of: DateTime<Utc>,
        stale_days: i64,
    ) -> Option<ExerciseProgress<'_>> {
        let exercise = self.catalog.by_id(exercise_id)?;
        let history = self.all_for(exercise_id);
        Some(ExerciseProgress::derive(exercise, history, as_of, stale_days))
    }

    pub fn summary(&self) -> Summary {
        Summary::from_histories(self.histories.values().map(|h| h.as_slice()))
    }

    /// Exercises paired with their history, in catalog order
    pub fn entries(&self) -> impl Iterator<Item = (&Exercise, &[WorkoutRecord])> {
        self.catalog
            .all()
            .into_iter()
            .map(|e| (e, self.all_for(e.id)))
    }
}
