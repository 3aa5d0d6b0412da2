//! Tips module - motivational messages shown once per week

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipCategory {
    Motivation,
    Training,
    Recovery,
}

impl TipCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            TipCategory::Motivation => "💪",
            TipCategory::Training => "🏋️",
            TipCategory::Recovery => "😴",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TipCategory::Motivation => "Motivation",
            TipCategory::Training => "Training",
            TipCategory::Recovery => "Recovery",
        }
    }
}

pub struct Tip {
    pub category: TipCategory,
    pub text: &'static str,
}

pub const TIPS: &[Tip] = &[
    // === MOTIVATION ===
    Tip {
        category: TipCategory::Motivation,
        text: "Showing up is the hardest rep. You already did it.",
    },
    Tip {
        category: TipCategory::Motivation,
        text: "Strength is built one boring session at a time. Keep stacking them.",
    },
    Tip {
        category: TipCategory::Motivation,
        text: "Compare yourself to the first entry in your log, not to anyone else.",
    },
    Tip {
        category: TipCategory::Motivation,
        text: "A short workout still counts. Twenty minutes beats zero.",
    },
    Tip {
        category: TipCategory::Motivation,
        text: "Every personal record started as a weight that felt impossible.",
    },

    // === TRAINING ===
    Tip {
        category: TipCategory::Training,
        text: "Progressive overload: add a little weight, a rep or a few seconds each week.",
    },
    Tip {
        category: TipCategory::Training,
        text: "Using a band on pull-ups? Step down to a lighter band once all sets feel clean.",
    },
    Tip {
        category: TipCategory::Training,
        text: "Form first. A rep that doesn't count shouldn't be logged.",
    },
    Tip {
        category: TipCategory::Training,
        text: "Stuck on a number for weeks? Change reps, tempo or rest before the exercise.",
    },
    Tip {
        category: TipCategory::Training,
        text: "Pause for two seconds at the hardest point of the movement to build strength there.",
    },

    // === RECOVERY ===
    Tip {
        category: TipCategory::Recovery,
        text: "Muscles grow between sessions, not during them. Sleep is part of the program.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "Rest 1-2 minutes between heavy sets, 30-60 seconds for endurance work.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "Drink water before you feel thirsty, especially on training days.",
    },
];

/// Pick a random tip
pub fn get_random_tip() -> &'static Tip {
    TIPS.choose(&mut rand::thread_rng()).unwrap_or(&TIPS[0])
}

pub fn format_tip(tip: &Tip) -> String {
    format!(
        "{} {}\n\n{}",
        tip.category.emoji(),
        tip.category.name(),
        tip.text
    )
}

/// ISO week identifier, e.g. 202409 for week 9 of 2024
pub fn week_id(date: NaiveDate) -> i64 {
    let week = date.iso_week();
    i64::from(week.year()) * 100 + i64::from(week.week())
}

/// Show the message when it was never shown or last shown in another week
pub fn should_show(last_shown: Option<i64>, current: i64) -> bool {
    last_shown != Some(current)
}
