//! The catalogue of known courses.
//!
//! A [`CourseDatabase`] is built once and never mutated. Building it resolves
//! every course's flattened requisite sets against the catalogue and derives
//! the reverse "required by" edges over the whole catalogue.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{instrument, warn};

use crate::domain::{Course, CourseCode};

/// An immutable mapping from course code to [`Course`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseDatabase {
    courses: BTreeMap<CourseCode, Course>,
}

impl CourseDatabase {
    /// Builds the database from a collection of courses.
    ///
    /// If two courses share a code, the later one replaces the earlier one.
    #[instrument(skip_all)]
    pub fn new(courses: impl IntoIterator<Item = Course>) -> Self {
        let mut by_code = BTreeMap::new();
        for course in courses {
            let code = course.code().clone();
            if by_code.insert(code.clone(), course).is_some() {
                warn!(%code, "duplicate course code, keeping the later definition");
            }
        }

        let known: BTreeSet<CourseCode> = by_code.keys().cloned().collect();
        let mut dependents: BTreeMap<CourseCode, BTreeSet<CourseCode>> = BTreeMap::new();
        for (code, course) in &mut by_code {
            course.resolve(|c| known.contains(c));
            for requisite in course.requisites() {
                dependents
                    .entry(requisite.clone())
                    .or_default()
                    .insert(code.clone());
            }
        }

        for (code, course) in &mut by_code {
            course.set_dependents(dependents.remove(code).unwrap_or_default());
        }

        Self { courses: by_code }
    }

    /// Looks up a course by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Course> {
        self.courses.get(code)
    }

    /// Whether the code names a known course.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.courses.contains_key(code)
    }

    /// Returns the stored copy of a code, if it is known.
    #[must_use]
    pub fn code(&self, code: &str) -> Option<&CourseCode> {
        self.courses.get_key_value(code).map(|(code, _)| code)
    }

    /// The number of courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the database holds no courses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Iterates over all courses in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Course> + '_ {
        self.courses.values()
    }
}

impl FromIterator<Course> for CourseDatabase {
    fn from_iter<T: IntoIterator<Item = Course>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expr, course::Notes};

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn expr(json: &str) -> Expr {
        Expr::from_json(json).unwrap()
    }

    fn sample() -> CourseDatabase {
        CourseDatabase::new([
            Course::new(code("MATH 100")),
            Course::new(code("CPSC 110")).with_exclusions(expr(r#"["or", "CPSC 103"]"#)),
            Course::new(code("CPSC 103")),
            Course::new(code("CPSC 121"))
                .with_prerequisites(expr(r#"["or", "CPSC 110", "GONE 100"]"#))
                .with_corequisites(expr(r#"["and", "MATH 100"]"#)),
            Course::new(code("CPSC 210"))
                .with_prerequisites(expr(r#"["and", "CPSC 110", "CPSC 121"]"#)),
        ])
    }

    #[test]
    fn flattened_sets_hold_known_codes_only() {
        let db = sample();
        let course = db.get("CPSC 121").unwrap();
        assert_eq!(
            course.flattened_prerequisites(),
            &BTreeSet::from([code("CPSC 110")])
        );
        assert_eq!(
            course.flattened_corequisites(),
            &BTreeSet::from([code("MATH 100")])
        );
    }

    #[test]
    fn dependents_cover_prerequisites_and_corequisites() {
        let db = sample();
        assert_eq!(
            db.get("CPSC 110").unwrap().dependents(),
            &BTreeSet::from([code("CPSC 121"), code("CPSC 210")])
        );
        assert_eq!(
            db.get("MATH 100").unwrap().dependents(),
            &BTreeSet::from([code("CPSC 121")])
        );
    }

    #[test]
    fn exclusions_do_not_create_dependents() {
        let db = sample();
        assert!(db.get("CPSC 103").unwrap().dependents().is_empty());
    }

    #[test]
    fn dependents_mirror_requisites() {
        let db = sample();
        for course in db.iter() {
            for dependent in course.dependents() {
                let other = db.get(dependent).unwrap();
                assert!(other.requisites().any(|c| c == course.code()));
            }
            for requisite in course.requisites() {
                let other = db.get(requisite).unwrap();
                assert!(other.dependents().contains(course.code()));
            }
        }
    }

    #[test]
    fn later_duplicate_wins() {
        let db = CourseDatabase::new([
            Course::new(code("A")).with_name("first"),
            Course::new(code("A")).with_name("second"),
        ]);
        assert_eq!(db.len(), 1);
        assert_eq!(db.get("A").unwrap().name(), Some("second"));
    }

    #[test]
    fn summary_lists_relations() {
        let db = CourseDatabase::new([
            Course::new(code("CPSC 110")),
            Course::new(code("CPSC 121"))
                .with_name("Models of Computation")
                .with_description("Logic and proofs.")
                .with_prerequisites(expr(r#"["and", "CPSC 110"]"#))
                .with_notes(Notes {
                    terms: Some("W1, W2".to_string()),
                    credits: Some("4".to_string()),
                    ..Notes::default()
                }),
        ]);

        assert_eq!(
            db.get("CPSC 121").unwrap().summary(),
            [
                "CPSC 121: Models of Computation",
                "Logic and proofs.",
                "Prereqs: CPSC 110",
                "Terms: W1, W2",
                "Credits: 4",
            ]
        );
        assert_eq!(
            db.get("CPSC 110").unwrap().summary(),
            ["CPSC 110", "Required by: CPSC 121"]
        );
    }

    #[test]
    fn summary_prefers_literal_note() {
        let db = CourseDatabase::new([
            Course::new(code("A")),
            Course::new(code("B"))
                .with_prerequisites(expr(r#"["and", "A"]"#))
                .with_notes(Notes {
                    prerequisites: Some("A, or permission of the department".to_string()),
                    ..Notes::default()
                }),
        ]);

        assert_eq!(
            db.get("B").unwrap().summary(),
            ["B", "Prereqs: A, or permission of the department"]
        );
    }
}
