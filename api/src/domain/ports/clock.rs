//! Clock port trait

use chrono::NaiveDateTime;

/// Source of wall-clock time for archive and entry names
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
