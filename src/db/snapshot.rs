//! JSON snapshot of the logbook
//!
//! Decoding never fails: entries that cannot be read are dropped with a
//! warning, missing histories default to empty, and numbers written as
//! strings are accepted.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::exercises::{Catalog, Exercise, ExerciseId, MetricType};
use crate::tracker::Tracker;
use crate::workout::{Band, Payload, RecordId, WorkoutRecord};

#[derive(Serialize)]
struct StoredExerciseRef<'a> {
    #[serde(flatten)]
    exercise: &'a Exercise,
    /// Projection of the latest record, ignored when reading
    current: Option<&'a Payload>,
    history: &'a [WorkoutRecord],
}

#[derive(Deserialize)]
struct StoredExercise {
    id: ExerciseId,
    name: String,
    #[serde(rename = "type")]
    kind: MetricType,
    #[serde(default)]
    category: String,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    history: Vec<Value>,
}

pub fn encode(tracker: &Tracker) -> Result<String> {
    let stored: Vec<_> = tracker
        .entries()
        .map(|(exercise, history)| StoredExerciseRef {
            exercise,
            current: tracker.current(exercise.id).map(|r| &r.payload),
            history,
        })
        .collect();
    Ok(serde_json::to_string(&stored)?)
}

pub fn decode(json: &str) -> Tracker {
    let entries = match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) | Err(_) => {
            warn!("Stored catalog is not a list, seeding presets");
            return Tracker::new(Catalog::presets());
        }
    };

    let mut catalog = Catalog::new();
    let mut histories = Vec::new();

    for entry in entries {
        let stored: StoredExercise = match serde_json::from_value(entry) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Dropping unreadable exercise: {}", e);
                continue;
            }
        };

        let exercise = Exercise {
            id: stored.id,
            name: stored.name,
            category: stored.category,
            kind: stored.kind,
            icon: stored
                .icon
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| stored.kind.default_icon().to_string()),
        };

        if !catalog.insert(exercise) {
            warn!(id = %stored.id, "Dropping exercise with duplicate or out of range id");
            continue;
        }
        histories.push((stored.id, stored.kind, stored.history));
    }

    let mut tracker = Tracker::new(catalog);
    let mut seen = HashSet::new();
    for (exercise_id, kind, history) in histories {
        for value in history {
            let restored = parse_record(&value, kind).is_some_and(|record| {
                let id = record.id;
                !seen.contains(&id) && tracker.restore(exercise_id, record) && seen.insert(id)
            });
            if !restored {
                warn!(exercise = %exercise_id, "Dropping unreadable record: {}", value);
            }
        }
    }
    tracker
}

fn parse_record(value: &Value, kind: MetricType) -> Option<WorkoutRecord> {
    let id = RecordId(value.get("id")?.as_u64()?);
    let logged_at = DateTime::parse_from_rfc3339(value.get("logged_at")?.as_str()?)
        .ok()?
        .with_timezone(&Utc);
    let payload = parse_payload(value.get("payload")?, kind)?;
    Some(WorkoutRecord { id, logged_at, payload })
}

fn parse_payload(value: &Value, kind: MetricType) -> Option<Payload> {
    // Untagged payloads are assumed to belong to the exercise
    if let Some(tag) = value.get("type")
        && MetricType::parse(tag.as_str()?)? != kind
    {
        return None;
    }

    let payload = match kind {
        MetricType::Weighted => Payload::Weighted {
            weight: number(value.get("weight")).filter(|w| *w >= 0.0),
            reps: count(value.get("reps")),
            sets: count(value.get("sets")),
        },
        MetricType::Bodyweight => Payload::Bodyweight {
            reps: count(value.get("reps")),
            sets: count(value.get("sets")),
            band: value
                .get("band")
                .and_then(Value::as_str)
                .map(Band::parse)
                .unwrap_or_default(),
        },
        MetricType::Timed => {
            let seconds = number(value.get("seconds")).unwrap_or(0.0);
            if !(0.0..=f64::from(u32::MAX)).contains(&seconds) {
                return None;
            }
            Payload::Timed {
                seconds: seconds as u32,
            }
        }
    };
    Some(payload)
}

/// Finite number, also accepted when written as a string
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Non-negative integer, 0 when missing or malformed
fn count(value: Option<&Value>) -> u32 {
    number(value).map_or(0, |n| n.max(0.0) as u32)
}
