use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The outcome of evaluating a requirement expression against a working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Satisfaction {
    /// Satisfied by courses marked done.
    Done,
    /// Not satisfied, and every course that could satisfy it is in the tree.
    None,
    /// Cannot be decided, because a deciding course is outside the tree.
    Outs,
}

/// The satisfiability classification of a course within a working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Marked as already taken.
    Done,
    /// Can be taken.
    #[default]
    None,
    /// Can be taken unless a credit excluded course outside the tree was taken.
    Xout,
    /// Cannot be taken unless a requisite outside the tree was taken.
    Outs,
    /// Missing a corequisite.
    Creq,
    /// Missing a prerequisite.
    Preq,
    /// A credit excluded course has already been taken.
    Excl,
}

impl Status {
    /// Every status, in legend order.
    pub const ALL: [Self; 7] = [
        Self::Done,
        Self::None,
        Self::Xout,
        Self::Outs,
        Self::Creq,
        Self::Preq,
        Self::Excl,
    ];

    /// The short tag used in data files and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::None => "none",
            Self::Xout => "xout",
            Self::Outs => "outs",
            Self::Creq => "creq",
            Self::Preq => "preq",
            Self::Excl => "excl",
        }
    }

    /// What the status means, phrased to follow a course code.
    ///
    /// ```
    /// # use coursetree::Status;
    /// assert_eq!(
    ///     format!("CPSC 110{}", Status::Done.description()),
    ///     "CPSC 110 is already taken."
    /// );
    /// ```
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Done => " is already taken.",
            Self::None => " can be taken.",
            Self::Xout => {
                " can be taken unless you've taken some credit excluded course outside the tree."
            }
            Self::Outs => {
                " cannot be taken unless you've taken some requisite course outside the tree."
            }
            Self::Creq => " cannot be taken, due to a missing corequisite.",
            Self::Preq => " cannot be taken, due to a missing prerequisite.",
            Self::Excl => {
                " cannot be taken, due to a credit excluded course that you've already taken."
            }
        }
    }

    /// Whether a course with this status can be taken.
    #[must_use]
    pub const fn is_takeable(self) -> bool {
        matches!(self, Self::None | Self::Xout)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognised status tag.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown status '{0}'")]
pub struct UnknownStatusError(String);

impl FromStr for Status {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatusError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "maybe".parse::<Status>(),
            Err(UnknownStatusError("maybe".to_string()))
        );
    }

    #[test]
    fn only_open_statuses_are_takeable() {
        let takeable: Vec<Status> = Status::ALL
            .into_iter()
            .filter(|status| status.is_takeable())
            .collect();
        assert_eq!(takeable, [Status::None, Status::Xout]);
    }

    #[test]
    fn serializes_as_lowercase_tag() {
        assert_eq!(serde_json::to_string(&Status::Xout).unwrap(), r#""xout""#);
    }
}
