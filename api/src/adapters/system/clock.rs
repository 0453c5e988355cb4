//! Wall-clock implementation of the `Clock` port

use chrono::{Local, NaiveDateTime};

use crate::domain::ports::Clock;

/// Local wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
