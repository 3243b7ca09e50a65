//! The "current time" capability used by the date and time stamping spells.
//!
//! Spells never read the system clock directly; they receive a [`Clock`] so
//! the pipeline stays deterministic under test.

use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// Time format used by the `ctime`/`dtime` metadata tags and the `x:HHMM` marker.
pub const HHMM_FMT: &str = "%H%M";

pub trait Clock: fmt::Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn hhmm(&self) -> String {
        self.now().format(HHMM_FMT).to_string()
    }
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Returns `None` if the date or time is out of range.
    pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<Self> {
        date.and_hms_opt(hour, minute, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
