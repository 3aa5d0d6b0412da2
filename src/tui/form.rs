//! Popup forms for logging entries and adding exercises

use crossterm::event::KeyCode;
use ratatui::prelude::*;

use crate::exercises::{ExerciseId, MetricType};
use crate::input::{self, EntryForm};
use crate::workout::{Band, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Weight,
    Reps,
    Sets,
    Band,
    Seconds,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Weight => "Weight (kg)",
            Field::Reps => "Reps",
            Field::Sets => "Sets",
            Field::Band => "Band",
            Field::Seconds => "Seconds",
        }
    }
}

/// Log entry form for one exercise
#[derive(Debug, Clone, PartialEq)]
pub struct LogForm {
    pub exercise_id: ExerciseId,
    pub kind: MetricType,
    pub entry: EntryForm,
    pub band: Band,
    active: usize,
}

impl LogForm {
    pub fn new(exercise_id: ExerciseId, kind: MetricType) -> Self {
        Self {
            exercise_id,
            kind,
            entry: EntryForm::default(),
            band: Band::None,
            active: 0,
        }
    }

    /// Fields relevant to the exercise type
    pub fn fields(&self) -> &'static [Field] {
        match self.kind {
            MetricType::Weighted => &[Field::Weight, Field::Reps, Field::Sets],
            MetricType::Bodyweight => &[Field::Reps, Field::Sets, Field::Band],
            MetricType::Timed => &[Field::Seconds],
        }
    }

    fn active_field(&self) -> Field {
        self.fields()[self.active % self.fields().len()]
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Weight => Some(&mut self.entry.weight),
            Field::Reps => Some(&mut self.entry.reps),
            Field::Sets => Some(&mut self.entry.sets),
            Field::Seconds => Some(&mut self.entry.seconds),
            Field::Band => None,
        }
    }

    fn text(&self, field: Field) -> String {
        match field {
            Field::Weight => self.entry.weight.clone(),
            Field::Reps => self.entry.reps.clone(),
            Field::Sets => self.entry.sets.clone(),
            Field::Seconds => self.entry.seconds.clone(),
            Field::Band => format!("< {} >", self.band.name()),
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let count = self.fields().len();
        let field = self.active_field();
        match code {
            KeyCode::Tab | KeyCode::Down => self.active = (self.active + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.active = (self.active + count - 1) % count,
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if field == Field::Band => {
                self.band = self.band.next();
            }
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut(field) {
                    text.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | ':' | '-') => {
                if let Some(text) = self.text_mut(field) {
                    text.push(c);
                }
            }
            _ => {}
        }
    }

    /// None when the entry must not be logged
    pub fn payload(&self) -> Option<Payload> {
        let mut entry = self.entry.clone();
        entry.band = self.band.name().to_string();
        input::parse_payload(self.kind, &entry)
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let active = self.active_field();
        self.fields()
            .iter()
            .map(|f| form_line(f.label(), self.text(*f), *f == active))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExerciseField {
    Name,
    Category,
    Kind,
}

const EXERCISE_FIELDS: &[ExerciseField] =
    &[ExerciseField::Name, ExerciseField::Category, ExerciseField::Kind];

/// New custom exercise form
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseForm {
    pub name: String,
    pub category: String,
    pub kind: MetricType,
    active: usize,
}

impl Default for ExerciseForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            kind: MetricType::Weighted,
            active: 0,
        }
    }
}

impl ExerciseForm {
    fn active_field(&self) -> ExerciseField {
        EXERCISE_FIELDS[self.active % EXERCISE_FIELDS.len()]
    }

    fn next_kind(&self) -> MetricType {
        let all = MetricType::all();
        let pos = all.iter().position(|k| *k == self.kind).unwrap_or(0);
        all[(pos + 1) % all.len()]
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let count = EXERCISE_FIELDS.len();
        let field = self.active_field();
        match code {
            KeyCode::Tab | KeyCode::Down => self.active = (self.active + 1) % count,
            KeyCode::BackTab | KeyCode::Up => self.active = (self.active + count - 1) % count,
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if field == ExerciseField::Kind => {
                self.kind = self.next_kind();
            }
            KeyCode::Backspace => match field {
                ExerciseField::Name => {
                    self.name.pop();
                }
                ExerciseField::Category => {
                    self.category.pop();
                }
                ExerciseField::Kind => {}
            },
            KeyCode::Char(c) => match field {
                ExerciseField::Name => self.name.push(c),
                ExerciseField::Category => self.category.push(c),
                ExerciseField::Kind => {}
            },
            _ => {}
        }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let active = self.active_field();
        vec![
            form_line("Name", self.name.clone(), active == ExerciseField::Name),
            form_line("Category", self.category.clone(), active == ExerciseField::Category),
            form_line("Type", format!("< {} >", self.kind), active == ExerciseField::Kind),
        ]
    }
}

fn form_line(label: &str, value: String, active: bool) -> Line<'static> {
    let style = if active {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default()
    };
    let cursor = if active { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<12}", label), style),
        Span::raw(format!("{}{}", value, cursor)),
    ])
}
