//! Boolean requirement expressions.
//!
//! Course data stores requisites as nested lists whose head is an operator:
//!
//! ```text
//! ["and", "MATH 100", ["or", "CPSC 110", "CPSC 103"]]
//! ```
//!
//! [`RawExpr`] mirrors that serialized shape; [`Expr`] is the validated tree
//! the rest of the crate works with.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::domain::{CourseCode, code::EmptyCodeError};

/// How the children of an [`Expr::Node`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Every child must be satisfied.
    And,
    /// At least one child must be satisfied.
    Or,
}

impl Operator {
    fn parse(tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if tag.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requirement expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A single course.
    Course(CourseCode),
    /// An operator applied to an ordered list of sub-expressions.
    Node {
        /// How the children combine.
        operator: Operator,
        /// The sub-expressions.
        children: Vec<Self>,
    },
}

impl Default for Expr {
    /// The empty expression, which imposes no requirement.
    fn default() -> Self {
        Self::Node {
            operator: Operator::And,
            children: Vec::new(),
        }
    }
}

impl Expr {
    /// A leaf naming a single course.
    #[must_use]
    pub const fn course(code: CourseCode) -> Self {
        Self::Course(code)
    }

    /// A node satisfied when all children are.
    #[must_use]
    pub const fn all(children: Vec<Self>) -> Self {
        Self::Node {
            operator: Operator::And,
            children,
        }
    }

    /// A node satisfied when any child is.
    #[must_use]
    pub const fn any(children: Vec<Self>) -> Self {
        Self::Node {
            operator: Operator::Or,
            children,
        }
    }

    /// Whether this expression names no course at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Course(_) => false,
            Self::Node { children, .. } => children.is_empty(),
        }
    }

    /// Iterates over every course code mentioned in the expression, in
    /// order of appearance, with duplicates.
    pub fn codes(&self) -> impl Iterator<Item = &CourseCode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            while let Some(expr) = stack.pop() {
                match expr {
                    Self::Course(code) => return Some(code),
                    Self::Node { children, .. } => stack.extend(children.iter().rev()),
                }
            }
            None
        })
    }

    /// Flattens the expression into the set of mentioned codes accepted by
    /// `known`, discarding the operators.
    pub fn flatten(&self, known: impl Fn(&CourseCode) -> bool) -> BTreeSet<CourseCode> {
        self.codes().filter(|code| known(code)).cloned().collect()
    }

    /// Parses an expression from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::Json`] if the text is not a list-or-string tree,
    /// or any other [`ExprError`] if the tree is malformed.
    pub fn from_json(json: &str) -> Result<Self, ExprError> {
        let raw: RawExpr = serde_json::from_str(json)?;
        Self::try_from(raw)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course(code) => write!(f, "{code}"),
            Self::Node { operator, children } => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {operator} ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// The serialized shape of an expression: a code, or a list headed by an
/// operator tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawExpr {
    /// A course code.
    Code(String),
    /// An operator tag followed by terms, or an empty list.
    List(Vec<RawExpr>),
}

impl Default for RawExpr {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// A requirement expression that could not be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum ExprError {
    /// The head of a list is not `and` or `or`.
    #[error("malformed expression: unrecognised operator '{0}'")]
    UnknownOperator(String),
    /// The head of a list is itself a list.
    #[error("malformed expression: operator slot holds a nested list")]
    MissingOperator,
    /// A course code is the empty string.
    #[error("malformed expression: {0}")]
    EmptyCode(#[from] EmptyCodeError),
    /// The text is not valid JSON for an expression.
    #[error("malformed expression: {0}")]
    Json(#[from] serde_json::Error),
}

impl TryFrom<RawExpr> for Expr {
    type Error = ExprError;

    fn try_from(raw: RawExpr) -> Result<Self, Self::Error> {
        match raw {
            RawExpr::Code(code) => Ok(Self::Course(CourseCode::new(code)?)),
            RawExpr::List(items) => {
                let mut items = items.into_iter();
                let operator = match items.next() {
                    None => return Ok(Self::default()),
                    Some(RawExpr::Code(tag)) => {
                        Operator::parse(&tag).ok_or(ExprError::UnknownOperator(tag))?
                    }
                    Some(RawExpr::List(_)) => return Err(ExprError::MissingOperator),
                };
                let children = items.map(Self::try_from).collect::<Result<_, _>>()?;
                Ok(Self::Node { operator, children })
            }
        }
    }
}

impl From<&Expr> for RawExpr {
    fn from(expr: &Expr) -> Self {
        match expr {
            Expr::Course(code) => Self::Code(code.to_string()),
            Expr::Node { children, .. } if children.is_empty() => Self::default(),
            Expr::Node { operator, children } => Self::List(
                std::iter::once(Self::Code(operator.to_string()))
                    .chain(children.iter().map(Self::from))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawExpr::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Expr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RawExpr::from(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    #[test]
    fn parses_nested_lists() {
        let expr = Expr::from_json(r#"["and", "MATH 100", ["or", "CPSC 110", "CPSC 103"]]"#)
            .unwrap();

        let expected = Expr::all(vec![
            Expr::course(code("MATH 100")),
            Expr::any(vec![
                Expr::course(code("CPSC 110")),
                Expr::course(code("CPSC 103")),
            ]),
        ]);
        assert_eq!(expr, expected);
    }

    #[test]
    fn empty_list_is_empty_expression() {
        let expr = Expr::from_json("[]").unwrap();
        assert!(expr.is_empty());
        assert_eq!(expr, Expr::default());
    }

    #[test]
    fn bare_code_is_a_leaf() {
        let expr = Expr::from_json(r#""CPSC 110""#).unwrap();
        assert_eq!(expr, Expr::course(code("CPSC 110")));
        assert!(!expr.is_empty());
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = Expr::from_json(r#"["xor", "A", "B"]"#).unwrap_err();
        match err {
            ExprError::UnknownOperator(tag) => assert_eq!(tag, "xor"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_list_in_operator_slot_is_rejected() {
        let err = Expr::from_json(r#"[["or", "A"], "B"]"#).unwrap_err();
        assert!(matches!(err, ExprError::MissingOperator));
    }

    #[test]
    fn empty_code_is_rejected() {
        let err = Expr::from_json(r#"["or", "A", ""]"#).unwrap_err();
        assert!(matches!(err, ExprError::EmptyCode(_)));
    }

    #[test]
    fn flatten_keeps_known_codes_only() {
        let expr = Expr::from_json(r#"["and", "A", ["or", "B", "GONE 999"], "A"]"#).unwrap();
        let flat = expr.flatten(|c| c.as_str() != "GONE 999");
        assert_eq!(flat, BTreeSet::from([code("A"), code("B")]));
    }

    #[test]
    fn codes_are_visited_in_order() {
        let expr = Expr::from_json(r#"["and", "A", ["or", "B", "C"], "D"]"#).unwrap();
        let codes: Vec<_> = expr.codes().map(CourseCode::as_str).collect();
        assert_eq!(codes, ["A", "B", "C", "D"]);
    }

    #[test]
    fn serializes_back_to_list_form() {
        let text = r#"["or","A",["and","B","C"]]"#;
        let expr = Expr::from_json(text).unwrap();
        assert_eq!(serde_json::to_string(&expr).unwrap(), text);
    }

    #[test]
    fn displays_infix() {
        let expr = Expr::from_json(r#"["and", "A", ["or", "B", "C"]]"#).unwrap();
        assert_eq!(expr.to_string(), "(A and (B or C))");
    }
}
