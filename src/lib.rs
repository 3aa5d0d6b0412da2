//! liftbook - Personal workout log
//!
//! Tracks weighted, bodyweight and timed exercises, derives personal
//! records and progress from the history of each exercise.

pub mod config;
pub mod db;
pub mod error;
pub mod exercises;
pub mod input;
pub mod progress;
pub mod tips;
pub mod tracker;
pub mod tui;
pub mod workout;

pub use db::Database;
pub use error::TrackerError;
pub use tracker::Tracker;
