//! Exercise definitions - catalog of preset and custom exercises

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable exercise identity, used as the key into the log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ExerciseId(pub u32);

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How progress on an exercise is measured
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Weighted,   // weight x reps x sets
    Bodyweight, // reps x sets, optional band
    Timed,      // hold duration
}

impl MetricType {
    pub fn all() -> &'static [MetricType] {
        &[MetricType::Weighted, MetricType::Bodyweight, MetricType::Timed]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricType::Weighted => "weighted",
            MetricType::Bodyweight => "bodyweight",
            MetricType::Timed => "timed",
        }
    }

    /// Default icon for exercises added by the user
    pub fn default_icon(&self) -> &'static str {
        match self {
            MetricType::Weighted => "🏋️",
            MetricType::Bodyweight => "🤸",
            MetricType::Timed => "⏱️",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weighted" | "weight" | "w" => Some(MetricType::Weighted),
            "bodyweight" | "bw" | "b" => Some(MetricType::Bodyweight),
            "timed" | "time" | "t" => Some(MetricType::Timed),
            _ => None,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: MetricType,
    pub icon: String,
}

struct Preset {
    name: &'static str,
    category: &'static str,
    kind: MetricType,
    icon: &'static str,
}

/// Seed catalog written on the first run
const PRESETS: &[Preset] = &[
    Preset {
        name: "Bench Press",
        category: "Chest",
        kind: MetricType::Weighted,
        icon: "🏋️",
    },
    Preset {
        name: "Push-ups",
        category: "Chest",
        kind: MetricType::Bodyweight,
        icon: "💪",
    },
    Preset {
        name: "Pull-ups",
        category: "Back",
        kind: MetricType::Bodyweight,
        icon: "🧗",
    },
    Preset {
        name: "Deadlift",
        category: "Back",
        kind: MetricType::Weighted,
        icon: "🏋️",
    },
    Preset {
        name: "Squat",
        category: "Legs",
        kind: MetricType::Weighted,
        icon: "🦵",
    },
    Preset {
        name: "Lunges",
        category: "Legs",
        kind: MetricType::Bodyweight,
        icon: "🦵",
    },
    Preset {
        name: "Overhead Press",
        category: "Shoulders",
        kind: MetricType::Weighted,
        icon: "🏋️",
    },
    Preset {
        name: "Dips",
        category: "Arms",
        kind: MetricType::Bodyweight,
        icon: "💪",
    },
    Preset {
        name: "Plank",
        category: "Core",
        kind: MetricType::Timed,
        icon: "🎯",
    },
    Preset {
        name: "Dead Hang",
        category: "Grip",
        kind: MetricType::Timed,
        icon: "✊",
    },
];

/// Exercise catalog indexed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: BTreeMap<ExerciseId, Exercise>,
    next_id: u32,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the preset exercises
    pub fn presets() -> Self {
        let mut catalog = Self::new();
        for preset in PRESETS {
            if let Some(exercise) = catalog
                .add(preset.name, preset.kind, preset.category)
                .and_then(|id| catalog.exercises.get_mut(&id))
            {
                exercise.icon = preset.icon.to_string();
            }
        }
        catalog
    }

    /// Add a custom exercise with a fresh id and the type's default icon.
    /// Returns `None` once the id space is used up.
    pub fn add(&mut self, name: &str, kind: MetricType, category: &str) -> Option<ExerciseId> {
        let mut raw = self.next_id;
        while self.exercises.contains_key(&ExerciseId(raw)) {
            raw = raw.checked_add(1)?;
        }
        self.next_id = raw.checked_add(1)?;

        let id = ExerciseId(raw);
        self.exercises.insert(
            id,
            Exercise {
                id,
                name: name.trim().to_string(),
                category: category.trim().to_string(),
                kind,
                icon: kind.default_icon().to_string(),
            },
        );
        Some(id)
    }

    /// Insert an already identified exercise (snapshot loading).
    /// Returns false if the id is taken or leaves no successor for the counter.
    pub fn insert(&mut self, exercise: Exercise) -> bool {
        let Some(next) = exercise.id.0.checked_add(1) else {
            return false;
        };
        if self.exercises.contains_key(&exercise.id) {
            return false;
        }
        self.next_id = self.next_id.max(next);
        self.exercises.insert(exercise.id, exercise);
        true
    }

    /// Remove an exercise definition. Use `Tracker::remove_exercise` to
    /// drop its history as well.
    pub fn remove(&mut self, id: ExerciseId) -> Option<Exercise> {
        self.exercises.remove(&id)
    }

    pub fn by_id(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.get(&id)
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<&Exercise> {
        let needle = name.trim().to_lowercase();
        self.exercises.values().find(|e| e.name.to_lowercase() == needle)
    }

    /// All exercises sorted by category, then name
    pub fn all(&self) -> Vec<&Exercise> {
        let mut all: Vec<_> = self.exercises.values().collect();
        all.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        all
    }

    /// Exercises grouped by category
    pub fn by_category(&self) -> BTreeMap<String, Vec<&Exercise>> {
        let mut groups: BTreeMap<String, Vec<&Exercise>> = BTreeMap::new();
        for exercise in self.all() {
            groups.entry(exercise.category.clone()).or_default().push(exercise);
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
