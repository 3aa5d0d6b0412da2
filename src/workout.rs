//! Workout records - a single logged instance of an exercise

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exercises::MetricType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resistance band assistance for bodyweight exercises
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    #[default]
    None,
    Light,
    Medium,
    Heavy,
}

impl Band {
    pub fn name(&self) -> &'static str {
        match self {
            Band::None => "none",
            Band::Light => "light",
            Band::Medium => "medium",
            Band::Heavy => "heavy",
        }
    }

    /// Unknown names fall back to no band
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" | "l" => Band::Light,
            "medium" | "m" => Band::Medium,
            "heavy" | "h" => Band::Heavy,
            _ => Band::None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Band::None => Band::Light,
            Band::Light => Band::Medium,
            Band::Medium => Band::Heavy,
            Band::Heavy => Band::None,
        }
    }
}

/// Type-specific fields of a record. The variant always matches the
/// metric type of the owning exercise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Payload {
    Weighted {
        /// None = weight not tracked that session
        weight: Option<f64>,
        reps: u32,
        sets: u32,
    },
    Bodyweight {
        reps: u32,
        sets: u32,
        band: Band,
    },
    Timed {
        seconds: u32,
    },
}

impl Payload {
    pub fn kind(&self) -> MetricType {
        match self {
            Payload::Weighted { .. } => MetricType::Weighted,
            Payload::Bodyweight { .. } => MetricType::Bodyweight,
            Payload::Timed { .. } => MetricType::Timed,
        }
    }

    /// Value of the primary metric field, if present and well-formed
    pub fn primary_value(&self) -> Option<f64> {
        match *self {
            Payload::Weighted { weight, .. } => weight.filter(|w| w.is_finite()),
            Payload::Bodyweight { reps, .. } => Some(f64::from(reps)),
            Payload::Timed { seconds } => Some(f64::from(seconds)),
        }
    }

    /// weight * reps * sets, only for weighted records with a weight
    pub fn volume(&self) -> Option<f64> {
        match *self {
            Payload::Weighted { weight: Some(w), reps, sets } if w.is_finite() => {
                Some(w * f64::from(reps) * f64::from(sets))
            }
            _ => None,
        }
    }

    /// Short human-readable summary, e.g. "100kg 5x3"
    pub fn describe(&self) -> String {
        match *self {
            Payload::Weighted { weight: Some(w), reps, sets } => {
                format!("{}kg {}x{}", format_number(w), sets, reps)
            }
            Payload::Weighted { weight: None, reps, sets } => format!("{}x{}", sets, reps),
            Payload::Bodyweight { reps, sets, band: Band::None } => format!("{}x{}", sets, reps),
            Payload::Bodyweight { reps, sets, band } => {
                format!("{}x{} ({} band)", sets, reps, band.name())
            }
            Payload::Timed { seconds } => format_duration(seconds),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: RecordId,
    pub logged_at: DateTime<Utc>,
    pub payload: Payload,
}

impl WorkoutRecord {
    /// Primary value if this record belongs to `kind`
    pub fn primary_value(&self, kind: MetricType) -> Option<f64> {
        if self.payload.kind() != kind {
            return None;
        }
        self.payload.primary_value()
    }
}

/// Format a metric value without a trailing ".0"
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Format duration in seconds to human-readable string
pub fn format_duration(secs: u32) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format a primary value in the unit of its metric type
pub fn format_value(kind: MetricType, value: f64) -> String {
    match kind {
        MetricType::Weighted => format!("{}kg", format_number(value)),
        MetricType::Bodyweight => format!("{} reps", format_number(value)),
        MetricType::Timed => format_duration(value.max(0.0) as u32),
    }
}
