//! Runtime settings collected from command line and environment

use crate::progress::metrics::DEFAULT_STALE_DAYS;
use crate::tracker::DEFAULT_RECENT_LIMIT;

pub const DEFAULT_DB_PATH: &str = "liftbook.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// SQLite file holding the logbook
    pub db_path: String,
    /// Entries shown in the recent activity view
    pub recent_limit: usize,
    /// Days without a session before suggesting an increase
    pub stale_days: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            stale_days: DEFAULT_STALE_DAYS,
        }
    }
}
