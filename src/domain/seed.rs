//! The course list a user types in to build a working set.
//!
//! A seed is written as two groups separated by a semicolon. The first group
//! lists courses to add to the tree, the second lists courses to mark as
//! already taken:
//!
//! ```text
//! CPSC 210, MATH 200; CPSC 110, MATH 100
//! ```

use std::{fmt, str::FromStr};

use crate::domain::{CourseCode, CourseDatabase};

/// Related courses that can be appended to a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Credit excluded courses.
    Exclusions,
    /// Courses that have the course as a prerequisite or corequisite.
    Dependents,
}

/// Parsed seed input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    fresh: Vec<CourseCode>,
    done: Vec<CourseCode>,
}

impl Seed {
    /// Creates a seed from explicit code lists.
    #[must_use]
    pub const fn new(fresh: Vec<CourseCode>, done: Vec<CourseCode>) -> Self {
        Self { fresh, done }
    }

    /// Parses seed text.
    ///
    /// Groups after the second are ignored, as are blank entries. When
    /// `normalize` is set each entry goes through [`CourseCode::normalize`];
    /// otherwise entries are only trimmed.
    #[must_use]
    pub fn parse(input: &str, normalize: bool) -> Self {
        let mut groups = input.split(';').map(|group| {
            group
                .split(',')
                .filter_map(|entry| {
                    if normalize {
                        CourseCode::normalize(entry)
                    } else {
                        CourseCode::new(entry.trim().to_string()).ok()
                    }
                })
                .collect::<Vec<_>>()
        });

        let fresh = groups.next().unwrap_or_default();
        let done = groups.next().unwrap_or_default();
        Self { fresh, done }
    }

    /// Codes to add to the tree, along with their requisites.
    #[must_use]
    pub fn fresh(&self) -> &[CourseCode] {
        &self.fresh
    }

    /// Codes to add to the tree already marked done.
    #[must_use]
    pub fn done(&self) -> &[CourseCode] {
        &self.done
    }

    /// Appends a course and its related courses to the fresh group.
    ///
    /// Returns `false`, leaving the seed untouched, if the course is unknown.
    pub fn expand(&mut self, db: &CourseDatabase, code: &str, relation: Relation) -> bool {
        let Some(course) = db.get(code) else {
            return false;
        };

        let related = match relation {
            Relation::Exclusions => course.flattened_exclusions(),
            Relation::Dependents => course.dependents(),
        };
        self.fresh.push(course.code().clone());
        self.fresh.extend(related.iter().cloned());
        true
    }
}

impl FromStr for Seed {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s, true))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |codes: &[CourseCode]| {
            codes
                .iter()
                .map(CourseCode::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        f.write_str(&join(&self.fresh))?;
        if !self.done.is_empty() {
            write!(f, "; {}", join(&self.done))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, Expr};

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    #[test]
    fn parses_both_groups() {
        let seed = Seed::parse("cpsc210, math200 ; CPSC 110,math 100", true);
        assert_eq!(seed.fresh(), [code("CPSC 210"), code("MATH 200")]);
        assert_eq!(seed.done(), [code("CPSC 110"), code("MATH 100")]);
    }

    #[test]
    fn done_group_is_optional() {
        let seed: Seed = "CPSC 110".parse().unwrap();
        assert_eq!(seed.fresh(), [code("CPSC 110")]);
        assert!(seed.done().is_empty());
    }

    #[test]
    fn blank_entries_are_skipped() {
        let seed = Seed::parse(" , CPSC 110,, ;; MATH 100", true);
        assert_eq!(seed.fresh(), [code("CPSC 110")]);
        assert!(seed.done().is_empty());
    }

    #[test]
    fn raw_parsing_only_trims() {
        let seed = Seed::parse(" cpsc110a , x;y ", false);
        assert_eq!(seed.fresh(), [code("cpsc110a"), code("x")]);
        assert_eq!(seed.done(), [code("y")]);
    }

    #[test]
    fn displays_in_input_format() {
        let seed = Seed::parse("a1, b2; c3", true);
        assert_eq!(seed.to_string(), "A 1, B 2; C 3");
        assert_eq!(Seed::parse("a1", true).to_string(), "A 1");
    }

    #[test]
    fn expand_appends_related_courses() {
        let db = CourseDatabase::new([
            Course::new(code("A")),
            Course::new(code("B")).with_prerequisites(Expr::course(code("A"))),
            Course::new(code("C")).with_exclusions(Expr::any(vec![
                Expr::course(code("A")),
                Expr::course(code("GONE 1")),
            ])),
        ]);

        let mut seed = Seed::default();
        assert!(seed.expand(&db, "A", Relation::Dependents));
        assert_eq!(seed.fresh(), [code("A"), code("B")]);

        let mut seed = Seed::default();
        assert!(seed.expand(&db, "C", Relation::Exclusions));
        assert_eq!(seed.fresh(), [code("C"), code("A")]);

        assert!(!seed.expand(&db, "NOPE", Relation::Exclusions));
        assert_eq!(seed.fresh().len(), 2);
    }
}
