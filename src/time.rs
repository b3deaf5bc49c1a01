use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Minute of day, `00:00`..`23:59`. NOTAM windows and scheduled times use
/// this; overnight wraparound is not modeled.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub u16);

#[derive(Error, Debug, PartialEq)]
#[error("horário inválido: {0}")]
pub struct ParseTimeError(String);

impl Time {
    pub const fn from_hm(hours: u16, mins: u16) -> Time {
        Time(hours * 60 + mins)
    }

    /// Inclusive at both ends.
    pub(crate) fn is_within(self, window: &(Time, Time)) -> bool {
        window.0 <= self && self <= window.1
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Time {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| ParseTimeError(s.to_string()))?;
        let h = h.parse::<u16>().map_err(|_| ParseTimeError(s.to_string()))?;
        let m = m.parse::<u16>().map_err(|_| ParseTimeError(s.to_string()))?;
        if h > 23 || m > 59 {
            return Err(ParseTimeError(s.to_string()));
        }
        Ok(Time::from_hm(h, m))
    }
}

impl From<NaiveTime> for Time {
    fn from(t: NaiveTime) -> Time {
        Time::from_hm(t.hour() as u16, t.minute() as u16)
    }
}
