//! The simulated game calendar.
//!
//! A [`GamePeriod`] is one month of game time. Artist statistics are recorded per
//! period and the game clock moves forward one period at a time.

use chrono::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A (month, year) pair on the game calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct GamePeriod {
    /// Year, e.g. 2024. Declared first so ordering is chronological.
    pub year: i32,
    /// Month in `1..=12`
    pub month: u32,
}

impl GamePeriod {
    /// Creates a period, returning `None` when `month` is outside `1..=12`.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            tracing::debug!("Rejected game period with month {}", month);
            None
        }
    }

    /// The period that follows this one. December rolls over into January of the next year.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// English name of the month, e.g. "December".
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

impl Default for GamePeriod {
    fn default() -> Self {
        Self { year: 2024, month: 1 }
    }
}

impl fmt::Display for GamePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}
