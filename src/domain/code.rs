use std::{borrow::Borrow, cmp::Ordering, fmt, hash, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

/// The identifier of a course, such as `CPSC 110`.
///
/// Codes are compared as plain strings. No structure is imposed beyond being
/// non-empty; see [`CourseCode::normalize`] for the lenient cleanup applied to
/// user-typed input.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(NonEmptyString);

/// Error returned when constructing a [`CourseCode`] from an empty string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("course code must not be empty")]
pub struct EmptyCodeError;

/// Subject letters, then the course number, then anything trailing.
static CODE_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\d]*)(\d*)").expect("valid regex"));

impl CourseCode {
    /// Creates a new course code.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyCodeError`] if the string is empty.
    pub fn new(code: String) -> Result<Self, EmptyCodeError> {
        NonEmptyString::new(code).map(Self).map_err(|_| EmptyCodeError)
    }

    /// Cleans up a user-typed course code.
    ///
    /// Whitespace is removed, a single space is inserted between the subject
    /// and the course number, anything after the number (such as a section
    /// letter) is dropped and the result is uppercased. Returns `None` when
    /// nothing meaningful is left.
    ///
    /// ```
    /// # use coursetree::CourseCode;
    /// let code = CourseCode::normalize(" cpsc110a ").unwrap();
    /// assert_eq!(code.as_str(), "CPSC 110");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let captures = CODE_PARTS.captures(&compact)?;
        let subject = captures.get(1).map_or("", |m| m.as_str());
        let number = captures.get(2).map_or("", |m| m.as_str());

        let normalized = format!("{subject} {number}").trim().to_uppercase();
        if normalized.len() > 1 {
            Self::new(normalized).ok()
        } else {
            None
        }
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl hash::Hash for CourseCode {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for CourseCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CourseCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Borrow<str> for CourseCode {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for CourseCode {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CourseCode {
    type Error = EmptyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CourseCode {
    type Error = EmptyCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for CourseCode {
    type Err = EmptyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("CPSC 110", "CPSC 110"; "already normal")]
    #[test_case("cpsc110", "CPSC 110"; "missing space")]
    #[test_case("  cpsc   110 ", "CPSC 110"; "extra whitespace")]
    #[test_case("MATH100A", "MATH 100"; "trailing section letter")]
    #[test_case("math 2 00 x", "MATH 200"; "split number")]
    #[test_case("engl", "ENGL"; "subject only")]
    fn normalize_cleans_up_input(raw: &str, expected: &str) {
        let code = CourseCode::normalize(raw).unwrap();
        assert_eq!(code.as_str(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "whitespace")]
    #[test_case("a"; "single letter")]
    fn normalize_rejects_blank_input(raw: &str) {
        assert!(CourseCode::normalize(raw).is_none());
    }

    #[test]
    fn empty_code_is_rejected() {
        assert_eq!(CourseCode::new(String::new()), Err(EmptyCodeError));
    }

    #[test]
    fn codes_order_as_strings() {
        let a: CourseCode = "CPSC 110".parse().unwrap();
        let b: CourseCode = "CPSC 121".parse().unwrap();
        assert!(a < b);
    }
}
