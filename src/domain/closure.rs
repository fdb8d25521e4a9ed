//! The set of courses a working set needs.

use std::collections::BTreeSet;

use tracing::{debug, instrument};

use crate::domain::{CourseCode, CourseDatabase};

/// Computes the working set for a list of seed codes.
///
/// Unknown seeds are dropped. Every known prerequisite and corequisite of an
/// included course is included in turn, until nothing new is added.
/// Exclusions are never followed.
#[instrument(skip_all)]
pub fn build_closure<'a, I>(db: &CourseDatabase, seeds: I) -> BTreeSet<CourseCode>
where
    I: IntoIterator<Item = &'a CourseCode>,
{
    let mut included: BTreeSet<CourseCode> = BTreeSet::new();
    let mut pending: Vec<&CourseCode> = Vec::new();

    for seed in seeds {
        match db.code(seed) {
            Some(code) if included.insert(code.clone()) => pending.push(code),
            Some(_) => {}
            None => debug!(%seed, "dropping unknown seed code"),
        }
    }

    // Each known course is pushed at most once, so the loop is bounded by the
    // size of the database.
    while let Some(code) = pending.pop() {
        let Some(course) = db.get(code) else {
            continue;
        };
        for requisite in course.requisites() {
            if included.insert(requisite.clone()) {
                pending.push(requisite);
            }
        }
    }

    debug!(size = included.len(), "built closure");
    included
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Course, Expr};

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn codes(list: &[&str]) -> BTreeSet<CourseCode> {
        list.iter().map(|c| code(c)).collect()
    }

    fn expr(json: &str) -> Expr {
        Expr::from_json(json).unwrap()
    }

    fn sample() -> CourseDatabase {
        CourseDatabase::new([
            Course::new(code("A")),
            Course::new(code("B")).with_prerequisites(expr(r#"["and", "A"]"#)),
            Course::new(code("C"))
                .with_prerequisites(expr(r#"["or", "B", "OLD 100"]"#))
                .with_corequisites(expr(r#"["and", "D"]"#)),
            Course::new(code("D")),
            Course::new(code("E")).with_exclusions(expr(r#"["or", "A"]"#)),
            Course::new(code("F")).with_prerequisites(expr(r#"["and", "G"]"#)),
            Course::new(code("G")).with_prerequisites(expr(r#"["and", "F"]"#)),
        ])
    }

    #[test]
    fn follows_prerequisites_and_corequisites() {
        let db = sample();
        let closure = build_closure(&db, &codes(&["C"]));
        assert_eq!(closure, codes(&["A", "B", "C", "D"]));
    }

    #[test]
    fn does_not_follow_exclusions() {
        let db = sample();
        let closure = build_closure(&db, &codes(&["E"]));
        assert_eq!(closure, codes(&["E"]));
    }

    #[test]
    fn drops_unknown_seeds() {
        let db = sample();
        let closure = build_closure(&db, &codes(&["B", "NOPE 101"]));
        assert_eq!(closure, codes(&["A", "B"]));
    }

    #[test]
    fn terminates_on_requisite_cycles() {
        let db = sample();
        let closure = build_closure(&db, &codes(&["F"]));
        assert_eq!(closure, codes(&["F", "G"]));
    }

    #[test]
    fn contains_its_seeds() {
        let db = sample();
        let seeds = codes(&["A", "C", "E"]);
        let closure = build_closure(&db, &seeds);
        assert!(seeds.is_subset(&closure));
    }

    #[test]
    fn is_idempotent() {
        let db = sample();
        for seed in ["A", "B", "C", "E", "F"] {
            let once = build_closure(&db, &codes(&[seed]));
            let twice = build_closure(&db, &once);
            assert_eq!(once, twice, "closure of {seed} changed when reapplied");
        }
    }
}
