//! Review status and the group rollup rule

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review status of an artifact (or, rolled up, of a group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not reviewed yet
    #[default]
    None,
    Ok,
    /// Needs attention
    Error,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::None, Status::Ok, Status::Error];

    /// Precedence used by [`rollup`]: the highest rank among members wins.
    pub fn rank(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::None => 1,
            Status::Error => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::None => "none",
            Status::Ok => "ok",
            Status::Error => "error",
        }
    }

    /// CSS class carried by artifact and group containers
    pub fn css_class(self) -> String {
        format!("status-{}", self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Status::None),
            "ok" => Ok(Status::Ok),
            "error" => Ok(Status::Error),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// Derive a group's status from its members: `error > none > ok`.
///
/// An empty group rolls up to `ok`, the state a group starts from before any
/// member has been seen.
pub fn rollup<I>(statuses: I) -> Status
where
    I: IntoIterator<Item = Status>,
{
    statuses
        .into_iter()
        .fold(Status::Ok, |acc, s| if s.rank() > acc.rank() { s } else { acc })
}
