//! Three-valued evaluation of requirement expressions.

use crate::domain::{Expr, Operator, Satisfaction, WorkingSet};

impl Expr {
    /// Evaluates the expression against the courses in a working set.
    ///
    /// A course in the working set counts as [`Satisfaction::Done`] when it is
    /// marked done and [`Satisfaction::None`] otherwise. A course outside the
    /// working set is [`Satisfaction::Outs`]. A node with no children is
    /// vacuously done.
    ///
    /// `and` nodes prefer `none`, then `outs`, then `done`; `or` nodes prefer
    /// `done`, then `outs`, then `none`.
    #[must_use]
    pub fn evaluate(&self, working_set: &WorkingSet) -> Satisfaction {
        match self {
            Self::Course(code) => match working_set.is_done(code) {
                Some(true) => Satisfaction::Done,
                Some(false) => Satisfaction::None,
                None => Satisfaction::Outs,
            },
            Self::Node { children, .. } if children.is_empty() => Satisfaction::Done,
            Self::Node { operator, children } => {
                let statuses: Vec<Satisfaction> = children
                    .iter()
                    .map(|child| child.evaluate(working_set))
                    .collect();
                combine(*operator, &statuses)
            }
        }
    }
}

fn combine(operator: Operator, statuses: &[Satisfaction]) -> Satisfaction {
    let (first, last) = match operator {
        Operator::And => (Satisfaction::None, Satisfaction::Done),
        Operator::Or => (Satisfaction::Done, Satisfaction::None),
    };

    if statuses.contains(&first) {
        first
    } else if statuses.contains(&Satisfaction::Outs) {
        Satisfaction::Outs
    } else {
        last
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::CourseCode;

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    /// `DONE` is in the tree and marked done, `NONE` is in the tree and not
    /// done, `OUTS` is left out of the tree.
    fn fixture() -> WorkingSet {
        let mut working_set = WorkingSet::default();
        working_set.insert(code("DONE"), true);
        working_set.insert(code("NONE"), false);
        working_set
    }

    fn leaf(satisfaction: Satisfaction) -> Expr {
        let name = match satisfaction {
            Satisfaction::Done => "DONE",
            Satisfaction::None => "NONE",
            Satisfaction::Outs => "OUTS",
        };
        Expr::course(code(name))
    }

    #[test]
    fn empty_expression_is_done() {
        let working_set = fixture();
        assert_eq!(Expr::default().evaluate(&working_set), Satisfaction::Done);
        assert_eq!(Expr::any(vec![]).evaluate(&working_set), Satisfaction::Done);
        assert_eq!(
            Expr::default().evaluate(&WorkingSet::default()),
            Satisfaction::Done
        );
    }

    #[test_case(Satisfaction::Done; "done leaf")]
    #[test_case(Satisfaction::None; "none leaf")]
    #[test_case(Satisfaction::Outs; "outs leaf")]
    fn leaf_reflects_working_set(expected: Satisfaction) {
        let working_set = fixture();
        assert_eq!(leaf(expected).evaluate(&working_set), expected);
    }

    #[test]
    fn unknown_code_is_outside_the_tree() {
        let working_set = fixture();
        let expr = Expr::course(code("NOT IN CATALOGUE"));
        assert_eq!(expr.evaluate(&working_set), Satisfaction::Outs);
    }

    #[test_case(Satisfaction::Done, Satisfaction::Done, Satisfaction::Done)]
    #[test_case(Satisfaction::Done, Satisfaction::None, Satisfaction::None)]
    #[test_case(Satisfaction::Done, Satisfaction::Outs, Satisfaction::Outs)]
    #[test_case(Satisfaction::None, Satisfaction::Done, Satisfaction::None)]
    #[test_case(Satisfaction::None, Satisfaction::None, Satisfaction::None)]
    #[test_case(Satisfaction::None, Satisfaction::Outs, Satisfaction::None)]
    #[test_case(Satisfaction::Outs, Satisfaction::Done, Satisfaction::Outs)]
    #[test_case(Satisfaction::Outs, Satisfaction::None, Satisfaction::None)]
    #[test_case(Satisfaction::Outs, Satisfaction::Outs, Satisfaction::Outs)]
    fn and_prefers_none_then_outs(left: Satisfaction, right: Satisfaction, expected: Satisfaction) {
        let working_set = fixture();
        let expr = Expr::all(vec![leaf(left), leaf(right)]);
        assert_eq!(expr.evaluate(&working_set), expected);
    }

    #[test_case(Satisfaction::Done, Satisfaction::Done, Satisfaction::Done)]
    #[test_case(Satisfaction::Done, Satisfaction::None, Satisfaction::Done)]
    #[test_case(Satisfaction::Done, Satisfaction::Outs, Satisfaction::Done)]
    #[test_case(Satisfaction::None, Satisfaction::Done, Satisfaction::Done)]
    #[test_case(Satisfaction::None, Satisfaction::None, Satisfaction::None)]
    #[test_case(Satisfaction::None, Satisfaction::Outs, Satisfaction::Outs)]
    #[test_case(Satisfaction::Outs, Satisfaction::Done, Satisfaction::Done)]
    #[test_case(Satisfaction::Outs, Satisfaction::None, Satisfaction::Outs)]
    #[test_case(Satisfaction::Outs, Satisfaction::Outs, Satisfaction::Outs)]
    fn or_prefers_done_then_outs(left: Satisfaction, right: Satisfaction, expected: Satisfaction) {
        let working_set = fixture();
        let expr = Expr::any(vec![leaf(left), leaf(right)]);
        assert_eq!(expr.evaluate(&working_set), expected);
    }

    #[test]
    fn nested_nodes_evaluate_recursively() {
        let working_set = fixture();
        // DONE and (OUTS or DONE)
        let expr = Expr::all(vec![
            leaf(Satisfaction::Done),
            Expr::any(vec![leaf(Satisfaction::Outs), leaf(Satisfaction::Done)]),
        ]);
        assert_eq!(expr.evaluate(&working_set), Satisfaction::Done);

        // NONE or (OUTS and DONE)
        let expr = Expr::any(vec![
            leaf(Satisfaction::None),
            Expr::all(vec![leaf(Satisfaction::Outs), leaf(Satisfaction::Done)]),
        ]);
        assert_eq!(expr.evaluate(&working_set), Satisfaction::Outs);
    }
}
