use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date bucket a task falls into. Never stored; always derived from the
/// task's due date and the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Today,
    Tomorrow,
    Upcoming,
}

impl Group {
    /// All groups in display order
    pub const ALL: [Group; 3] = [Group::Today, Group::Tomorrow, Group::Upcoming];

    /// Classify a due date relative to `today`. Overdue tasks count as today.
    pub fn of(due: NaiveDate, today: NaiveDate) -> Group {
        if due <= today {
            Group::Today
        } else if Some(due) == today.checked_add_days(Days::new(1)) {
            Group::Tomorrow
        } else {
            Group::Upcoming
        }
    }

    /// Sort rank: today = 0, tomorrow = 1, upcoming = 2
    pub fn rank(self) -> usize {
        match self {
            Group::Today => 0,
            Group::Tomorrow => 1,
            Group::Upcoming => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Group::Today => "Today",
            Group::Tomorrow => "Tomorrow",
            Group::Upcoming => "Upcoming",
        }
    }

    /// The date a task receives when it is dropped into this group from
    /// another one.
    pub fn canonical_date(self, today: NaiveDate, upcoming_offset_days: u32) -> NaiveDate {
        let offset = match self {
            Group::Today => 0,
            Group::Tomorrow => 1,
            Group::Upcoming => u64::from(upcoming_offset_days),
        };
        today.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Today => write!(f, "today"),
            Group::Tomorrow => write!(f, "tomorrow"),
            Group::Upcoming => write!(f, "upcoming"),
        }
    }
}

impl FromStr for Group {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Group::Today),
            "tomorrow" => Ok(Group::Tomorrow),
            "upcoming" => Ok(Group::Upcoming),
            _ => Err(format!(
                "unknown group '{}' (expected: today, tomorrow, upcoming)",
                s
            )),
        }
    }
}

/// Parse a due date expression: `today`, `tomorrow`, `upcoming`, `+N`,
/// `+Nd`, or `YYYY-MM-DD`.
pub fn parse_due(expr: &str, today: NaiveDate, upcoming_offset_days: u32) -> Result<NaiveDate, String> {
    let expr = expr.trim();
    if let Ok(group) = expr.parse::<Group>() {
        return Ok(group.canonical_date(today, upcoming_offset_days));
    }
    if let Some(rest) = expr.strip_prefix('+') {
        let digits = rest.strip_suffix('d').unwrap_or(rest);
        let days: u64 = digits
            .parse()
            .map_err(|_| format!("invalid day offset '{}'", expr))?;
        return today
            .checked_add_days(Days::new(days))
            .ok_or_else(|| format!("day offset out of range: {}", expr));
    }
    NaiveDate::parse_from_str(expr, "%Y-%m-%d").map_err(|_| {
        format!(
            "invalid due date '{}' (expected: today, tomorrow, upcoming, +N, or YYYY-MM-DD)",
            expr
        )
    })
}
