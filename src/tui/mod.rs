//! TUI module - Terminal dashboard with ratatui

mod form;

use anyhow::Result;
use chrono::{Local, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
};
use std::io::{stdout, Stdout};
use tracing::info;

use crate::config::Settings;
use crate::db::Database;
use crate::exercises::{Catalog, ExerciseId};
use crate::progress::metrics::{self, ExerciseProgress};
use crate::tips::{self, Tip};
use crate::tracker::Tracker;
use crate::workout::{format_number, format_value, RecordId, WorkoutRecord};

pub use form::{ExerciseForm, LogForm};

type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Exercises,
    History,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Log(LogForm),
    AddExercise(ExerciseForm),
    ConfirmDelete(ExerciseId),
}

/// App state for TUI
pub struct App {
    db: Database,
    tracker: Tracker,
    settings: Settings,
    exercises: ListState,
    history: TableState,
    focus: Focus,
    mode: Mode,
    motivation: Option<&'static Tip>,
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database, settings: Settings) -> Result<Self> {
        let tracker = db.load_tracker()?;

        let week = tips::week_id(Local::now().date_naive());
        let motivation = if tips::should_show(db.last_motivation_week()?, week) {
            db.set_motivation_week(week)?;
            Some(tips::get_random_tip())
        } else {
            None
        };

        let mut exercises = ListState::default();
        if !tracker.catalog().is_empty() {
            exercises.select(Some(0));
        }

        Ok(Self {
            db,
            tracker,
            settings,
            exercises,
            history: TableState::default(),
            focus: Focus::Exercises,
            mode: Mode::Browse,
            motivation,
            status: None,
            should_quit: false,
        })
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn motivation(&self) -> Option<&'static Tip> {
        self.motivation
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        let result = (|| -> Result<()> {
            while !self.should_quit {
                terminal.draw(|frame| self.render(frame))?;
                self.handle_events()?;
            }
            Ok(())
        })();

        restore_terminal()?;
        result
    }

    fn exercise_ids(&self) -> Vec<ExerciseId> {
        self.tracker.catalog().all().iter().map(|e| e.id).collect()
    }

    pub fn selected_exercise(&self) -> Option<ExerciseId> {
        let ids = self.exercise_ids();
        self.exercises.selected().and_then(|i| ids.get(i).copied())
    }

    pub fn select_exercise(&mut self, id: ExerciseId) {
        let pos = self.exercise_ids().iter().position(|e| *e == id);
        self.exercises.select(pos);
        self.history.select(None);
    }

    /// History of the selected exercise, newest first
    fn history_rows(&self) -> Vec<&WorkoutRecord> {
        let Some(id) = self.selected_exercise() else {
            return Vec::new();
        };
        let mut rows = metrics::chronological(self.tracker.all_for(id));
        rows.reverse();
        rows
    }

    fn selected_record(&self) -> Option<RecordId> {
        let rows = self.history_rows();
        self.history.selected().and_then(|i| rows.get(i).map(|r| r.id))
    }

    fn save(&mut self) -> Result<()> {
        self.db.save_tracker(&self.tracker)
    }

    fn clamp_selection(&mut self) {
        let len = self.tracker.catalog().len();
        match self.exercises.selected() {
            _ if len == 0 => self.exercises.select(None),
            Some(i) if i >= len => self.exercises.select(Some(len - 1)),
            None => self.exercises.select(Some(0)),
            _ => {}
        }

        let rows = self.history_rows().len();
        match self.history.selected() {
            _ if rows == 0 => self.history.select(None),
            Some(i) if i >= rows => self.history.select(Some(rows - 1)),
            _ => {}
        }
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key)?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.motivation.take().is_some() {
            return Ok(());
        }

        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse_key(key)?,
            Mode::Log(mut form) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit_log(&form)?,
                _ => {
                    form.handle_key(key.code);
                    self.mode = Mode::Log(form);
                }
            },
            Mode::AddExercise(mut form) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit_exercise(&form)?,
                _ => {
                    form.handle_key(key.code);
                    self.mode = Mode::AddExercise(form);
                }
            },
            Mode::ConfirmDelete(id) => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.delete_exercise(id)?;
                }
            }
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    Focus::Exercises => Focus::History,
                    Focus::History => Focus::Exercises,
                };
                if self.focus == Focus::History && self.history.selected().is_none() {
                    self.history.select(Some(0));
                }
                self.clamp_selection();
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                let selected = self
                    .selected_exercise()
                    .and_then(|id| self.tracker.exercise(id))
                    .map(|e| (e.id, e.kind));
                if let Some((id, kind)) = selected {
                    self.mode = Mode::Log(LogForm::new(id, kind));
                }
            }
            KeyCode::Char('a') => self.mode = Mode::AddExercise(ExerciseForm::default()),
            KeyCode::Char('d') | KeyCode::Delete if self.focus == Focus::History => {
                self.delete_selected_record()?;
            }
            KeyCode::Char('X') => {
                if let Some(id) = self.selected_exercise() {
                    self.mode = Mode::ConfirmDelete(id);
                }
            }
            KeyCode::Char('r') => {
                self.tracker = self.db.load_tracker()?;
                self.clamp_selection();
            }
            _ => {}
        }
        Ok(())
    }

    fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.focus {
            Focus::Exercises => (self.exercises.selected(), self.tracker.catalog().len()),
            Focus::History => (self.history.selected(), self.history_rows().len()),
        };
        let next = (len > 0).then(|| {
            let current = selected.unwrap_or(0) as isize;
            (current + delta).clamp(0, len as isize - 1) as usize
        });

        match self.focus {
            Focus::Exercises => {
                self.exercises.select(next);
                self.history.select(None);
            }
            Focus::History => self.history.select(next),
        }
    }

    fn submit_log(&mut self, form: &LogForm) -> Result<()> {
        let Some(payload) = form.payload() else {
            self.status = Some("Negative duration, nothing logged".to_string());
            return Ok(());
        };

        let record_id = self.tracker.append(form.exercise_id, Utc::now(), payload)?;
        self.save()?;

        let history = self.tracker.all_for(form.exercise_id);
        let name = self.tracker.exercise(form.exercise_id).map_or("", |e| e.name.as_str());
        let new_record = history
            .iter()
            .find(|r| r.id == record_id)
            .is_some_and(|r| metrics::is_new_record(r, history, form.kind));

        info!(exercise = name, record = %record_id, new_record, "Logged");
        self.status = Some(if new_record {
            format!("Logged {}: {} ★ new record!", name, payload.describe())
        } else {
            format!("Logged {}: {}", name, payload.describe())
        });
        self.history.select(None);
        Ok(())
    }

    fn submit_exercise(&mut self, form: &ExerciseForm) -> Result<()> {
        let name = form.name.trim();
        if name.is_empty() {
            self.status = Some("Exercise needs a name".to_string());
            return Ok(());
        }
        let category = if form.category.trim().is_empty() { "Other" } else { form.category.trim() };

        let id = self.tracker.add_exercise(name, form.kind, category)?;
        self.save()?;
        info!(%id, name, "Exercise added");
        self.status = Some(format!("Added {}", name));
        self.select_exercise(id);
        Ok(())
    }

    fn delete_exercise(&mut self, id: ExerciseId) -> Result<()> {
        if let Some(exercise) = self.tracker.remove_exercise(id) {
            self.save()?;
            info!(%id, name = exercise.name.as_str(), "Exercise deleted");
            self.status = Some(format!("Deleted {} and its history", exercise.name));
        }
        self.clamp_selection();
        Ok(())
    }

    fn delete_selected_record(&mut self) -> Result<()> {
        let (Some(exercise_id), Some(record_id)) =
            (self.selected_exercise(), self.selected_record())
        else {
            return Ok(());
        };
        if let Some(record) = self.tracker.remove(exercise_id, record_id) {
            self.save()?;
            self.status = Some(format!("Deleted entry {}", record.payload.describe()));
        }
        self.clamp_selection();
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new("liftbook - Workout Log")
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[1]);
        self.render_exercises(frame, body[0]);
        self.render_detail(frame, body[1]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[2]);
        self.render_stats(frame, bottom[0]);
        self.render_recent(frame, bottom[1]);

        // Footer
        let help = match (&self.mode, self.focus) {
            (Mode::Browse, Focus::Exercises) => {
                "q: quit | j/k: move | tab: history | enter: log | a: add | X: delete exercise"
            }
            (Mode::Browse, Focus::History) => {
                "q: quit | j/k: move | tab: exercises | d: delete entry | enter: log"
            }
            (Mode::Log(_), _) | (Mode::AddExercise(_), _) => {
                "tab/↑↓: field | space: cycle | enter: save | esc: cancel"
            }
            (Mode::ConfirmDelete(_), _) => "y: delete | any other key: cancel",
        };
        let footer_text = match &self.status {
            Some(status) => format!("{} | {}", status, help),
            None => help.to_string(),
        };
        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[3]);

        self.render_popup(frame, area);
    }

    fn render_exercises(&mut self, frame: &mut Frame, area: Rect) {
        let list = List::new(exercise_items(self.tracker.catalog()))
            .block(focus_block("Exercises", self.focus == Focus::Exercises))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.exercises);
    }

    fn render_detail(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(3)])
            .split(area);

        let Some(progress) = self
            .selected_exercise()
            .and_then(|id| self.tracker.progress(id, Utc::now(), self.settings.stale_days))
        else {
            let empty = Paragraph::new("No exercise selected. Press 'a' to add one.")
                .block(Block::default().borders(Borders::ALL).title("Progress"));
            frame.render_widget(empty, area);
            return;
        };

        let lines = progress_lines(&progress, self.settings.stale_days);
        let exercise = progress.exercise;
        let title = format!("{} {} ({})", exercise.icon, exercise.name, exercise.kind);
        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(detail, chunks[0]);

        let kind = progress.exercise.kind;
        let history = self.tracker.all_for(progress.exercise.id);
        let rows: Vec<Row> = self
            .history_rows()
            .into_iter()
            .map(|r| {
                let direction =
                    metrics::direction_vs_previous(r, metrics::preceding(history, r), kind);
                let marker = if metrics::is_new_record(r, history, kind) { "★" } else { "" };
                Row::new(vec![
                    Cell::from(
                        r.logged_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
                    ),
                    Cell::from(r.payload.describe()),
                    Cell::from(direction.arrow()),
                    Cell::from(marker),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(17),
                Constraint::Min(16),
                Constraint::Length(3),
                Constraint::Length(3),
            ],
        )
        .header(Row::new(vec!["Date", "Entry", "Δ", "PR"]).style(Style::default().bold()))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(focus_block("History", self.focus == Focus::History));

        frame.render_stateful_widget(table, chunks[1], &mut self.history);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let summary = self.tracker.summary();
        let lines = vec![
            Line::from(format!("Sessions:       {}", summary.total_sessions)),
            Line::from(format!("Exercises used: {}", summary.exercises_used)),
            Line::from(format!("Total volume:   {}kg", format_number(summary.total_volume))),
            Line::from(format!("Per week:       {:.1}", summary.weekly_frequency)),
        ];
        let stats =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
        frame.render_widget(stats, area);
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .tracker
            .all_records(self.settings.recent_limit)
            .into_iter()
            .map(|entry| {
                ListItem::new(format!(
                    "{} {} {}: {}",
                    entry.record.logged_at.with_timezone(&Local).format("%m-%d %H:%M"),
                    entry.exercise.icon,
                    entry.exercise.name,
                    entry.record.payload.describe()
                ))
            })
            .collect();
        let recent = List::new(items).block(Block::default().borders(Borders::ALL).title("Recent"));
        frame.render_widget(recent, area);
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        if let Some(tip) = self.motivation {
            let popup = popup_area(area, 60, 8);
            frame.render_widget(Clear, popup);
            let text = Paragraph::new(tips::format_tip(tip))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("This week").fg(Color::Green));
            frame.render_widget(text, popup);
            return;
        }

        match &self.mode {
            Mode::Browse => {}
            Mode::Log(form) => {
                let name = self.tracker.exercise(form.exercise_id).map_or("", |e| e.name.as_str());
                let popup = popup_area(area, 44, form.fields().len() as u16 + 2);
                frame.render_widget(Clear, popup);
                let text = Paragraph::new(form.lines())
                    .block(Block::default().borders(Borders::ALL).title(format!("Log {}", name)));
                frame.render_widget(text, popup);
            }
            Mode::AddExercise(form) => {
                let popup = popup_area(area, 44, 5);
                frame.render_widget(Clear, popup);
                let text = Paragraph::new(form.lines())
                    .block(Block::default().borders(Borders::ALL).title("New exercise"));
                frame.render_widget(text, popup);
            }
            Mode::ConfirmDelete(id) => {
                let name = self.tracker.exercise(*id).map_or("", |e| e.name.as_str());
                let popup = popup_area(area, 50, 3);
                frame.render_widget(Clear, popup);
                let text = Paragraph::new(format!("Delete {} and all its entries? (y/n)", name))
                    .block(Block::default().borders(Borders::ALL).title("Confirm").fg(Color::Red));
                frame.render_widget(text, popup);
            }
        }
    }
}

/// One item per exercise; the first of each category carries its header
fn exercise_items(catalog: &Catalog) -> Vec<ListItem<'static>> {
    let mut last_category: Option<String> = None;
    catalog
        .all()
        .into_iter()
        .map(|e| {
            let entry = Line::from(format!("  {} {}", e.icon, e.name));
            let category = e.category.to_lowercase();
            if last_category.as_ref() != Some(&category) {
                last_category = Some(category);
                let header = Line::from(e.category.clone())
                    .style(Style::default().fg(Color::Yellow).bold());
                ListItem::new(vec![header, entry])
            } else {
                ListItem::new(entry)
            }
        })
        .collect()
}

fn progress_lines(progress: &ExerciseProgress<'_>, stale_days: i64) -> Vec<Line<'static>> {
    let kind = progress.exercise.kind;
    let mut lines = Vec::new();

    lines.push(Line::from(format!(
        "Current: {}",
        progress.current.map_or("-".to_string(), |r| r.payload.describe())
    )));
    lines.push(Line::from(format!(
        "Personal record: {}",
        progress.personal_record.map_or("-".to_string(), |v| format_value(kind, v))
    )));

    match progress.comparison {
        Some(cmp) => {
            let change = cmp.percent_change();
            let color = if change > 0.0 {
                Color::Green
            } else if change < 0.0 {
                Color::Red
            } else {
                Color::Gray
            };
            lines.push(Line::from(vec![
                Span::raw(format!(
                    "Since start: {} → {} ",
                    format_value(kind, cmp.previous),
                    format_value(kind, cmp.current)
                )),
                Span::styled(format!("({:+.1}%)", change), Style::default().fg(color)),
            ]));
        }
        None => lines.push(Line::from("Since start: log two sessions to compare")),
    }

    let last = match progress.days_since {
        None => "never".to_string(),
        Some(0) => "today".to_string(),
        Some(1) => "1 day ago".to_string(),
        Some(d) => format!("{} days ago", d),
    };
    lines.push(Line::from(format!("Last session: {} ({} total)", last, progress.sessions)));

    if progress.needs_increase {
        lines.push(Line::from(Span::styled(
            format!("{}+ days since last session: time to increase difficulty", stale_days),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

fn focus_block(title: &str, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::MetricType;
    use crate::workout::Payload;
    use chrono::Duration;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn create_app() -> App {
        let db = Database::open_in_memory().unwrap();
        let mut app = App::new(db, Settings::default()).unwrap();
        // First key only dismisses the weekly message
        assert!(app.motivation().is_some());
        press(&mut app, KeyCode::Char('x'));
        app
    }

    fn select_by_name(app: &mut App, name: &str) -> ExerciseId {
        let id = app.tracker().catalog().find_by_name(name).unwrap().id;
        app.select_exercise(id);
        id
    }

    #[test]
    fn test_motivation_shown_once_per_week() {
        let db = Database::open_in_memory().unwrap();
        let week = tips::week_id(Local::now().date_naive());
        db.set_motivation_week(week).unwrap();
        let app = App::new(db, Settings::default()).unwrap();
        assert!(app.motivation().is_none());
    }

    #[test]
    fn test_log_weighted_entry() {
        let mut app = create_app();
        let squat = select_by_name(&mut app, "Squat");

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode(), Mode::Log(_)));
        type_text(&mut app, "100");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "5");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "3");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), &Mode::Browse);
        let current = app.tracker().current(squat).unwrap();
        assert_eq!(
            current.payload,
            Payload::Weighted {
                weight: Some(100.0),
                reps: 5,
                sets: 3
            }
        );
        assert!(app.status().unwrap().contains("new record"));
    }

    #[test]
    fn test_negative_duration_logs_nothing() {
        let mut app = create_app();
        let plank = select_by_name(&mut app, "Plank");

        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "-30");
        press(&mut app, KeyCode::Enter);

        assert!(app.tracker().all_for(plank).is_empty());
        assert!(app.status().unwrap().contains("nothing logged"));
    }

    #[test]
    fn test_escape_cancels_form() {
        let mut app = create_app();
        let plank = select_by_name(&mut app, "Plank");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "60");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode(), &Mode::Browse);
        assert!(app.tracker().all_for(plank).is_empty());
    }

    #[test]
    fn test_add_and_delete_exercise() {
        let mut app = create_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Farmer Carry");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Grip");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        let carry = app.tracker().catalog().find_by_name("farmer carry").unwrap().clone();
        assert_eq!(carry.kind, MetricType::Timed);
        assert_eq!(carry.category, "Grip");
        assert_eq!(app.selected_exercise(), Some(carry.id));

        press(&mut app, KeyCode::Char('X'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.tracker().exercise(carry.id).is_none());
    }

    #[test]
    fn test_delete_history_entry_rolls_back_current() {
        let mut app = create_app();
        let plank = select_by_name(&mut app, "Plank");
        let first = app
            .tracker
            .append(plank, Utc::now() - Duration::days(1), Payload::Timed { seconds: 40 })
            .unwrap();
        app.tracker
            .append(plank, Utc::now(), Payload::Timed { seconds: 50 })
            .unwrap();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::History);
        // Newest entry is the first row
        press(&mut app, KeyCode::Char('d'));

        assert_eq!(app.tracker().current(plank).map(|r| r.id), Some(first));
        let reloaded = app.db.load_tracker().unwrap();
        assert_eq!(reloaded.all_for(plank).len(), 1);
    }

    fn log_planks(app: &mut App, seconds: &[u32]) -> ExerciseId {
        let plank = select_by_name(app, "Plank");
        let start = Utc::now() - Duration::days(seconds.len() as i64);
        for (i, s) in seconds.iter().enumerate() {
            app.tracker
                .append(plank, start + Duration::days(i as i64), Payload::Timed { seconds: *s })
                .unwrap();
        }
        plank
    }

    #[test]
    fn test_move_selection_exercises_clamps_at_both_ends() {
        let mut app = create_app();
        let len = app.tracker().catalog().len();
        assert_eq!(app.exercises.selected(), Some(0));

        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.exercises.selected(), Some(0));

        for _ in 0..len + 3 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.exercises.selected(), Some(len - 1));

        press(&mut app, KeyCode::Up);
        assert_eq!(app.exercises.selected(), Some(len - 2));
    }

    #[test]
    fn test_move_selection_history_clamps_and_resets_on_exercise_change() {
        let mut app = create_app();
        let plank = log_planks(&mut app, &[30, 45, 60]);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.history.selected(), Some(0));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.history.selected(), Some(0));
        for _ in 0..5 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.history.selected(), Some(2));
        assert_eq!(app.selected_exercise(), Some(plank));

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Exercises);
        press(&mut app, KeyCode::Char('j'));
        assert_ne!(app.selected_exercise(), Some(plank));
        assert_eq!(app.history.selected(), None);
    }

    #[test]
    fn test_move_selection_empty_history() {
        let mut app = create_app();
        let plank = select_by_name(&mut app, "Plank");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.history.selected(), None);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.history.selected(), None);

        press(&mut app, KeyCode::Char('d'));
        assert!(app.tracker().all_for(plank).is_empty());
        assert_eq!(app.selected_exercise(), Some(plank));
    }

    #[test]
    fn test_selection_stays_valid_after_deletes() {
        let mut app = create_app();
        let plank = log_planks(&mut app, &[30, 45]);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.history.selected(), Some(1));

        // Oldest row goes, selection moves onto the remaining one
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.tracker().all_for(plank).len(), 1);
        assert_eq!(app.history.selected(), Some(0));

        press(&mut app, KeyCode::Char('d'));
        assert!(app.tracker().all_for(plank).is_empty());
        assert_eq!(app.history.selected(), None);

        press(&mut app, KeyCode::Tab);
        let len = app.tracker().catalog().len();
        for _ in 0..len {
            press(&mut app, KeyCode::Char('j'));
        }
        press(&mut app, KeyCode::Char('X'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.tracker().catalog().len(), len - 1);
        assert_eq!(app.exercises.selected(), Some(len - 2));
        assert!(app.selected_exercise().is_some());
    }

    #[test]
    fn test_category_header_ignores_case() {
        let mut catalog = Catalog::new();
        catalog.add("Squat", MetricType::Weighted, "Legs").unwrap();
        catalog.add("Lunge", MetricType::Bodyweight, "legs").unwrap();
        catalog.add("Curl", MetricType::Weighted, "Arms").unwrap();

        let heights: Vec<usize> = exercise_items(&catalog).iter().map(ListItem::height).collect();
        assert_eq!(heights, vec![2, 2, 1]);
    }
}
