//! The on-disk shape of a course.

use serde::Deserialize;

use crate::domain::{Course, CourseCode, Expr, ExprError, Notes, RawExpr};

/// A course as it appears in a database file, keyed by its code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseRecord {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "description")]
    desc: Option<String>,
    #[serde(default, alias = "prerequisites")]
    preq: RawExpr,
    #[serde(default, alias = "corequisites")]
    creq: RawExpr,
    #[serde(default, alias = "exclusions")]
    excl: RawExpr,
    #[serde(default)]
    prer: Option<Scalar>,
    #[serde(default)]
    crer: Option<Scalar>,
    #[serde(default)]
    terms: Option<Scalar>,
    #[serde(default, alias = "credits")]
    cred: Option<Scalar>,
}

/// Free text that data files sometimes store as a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
        }
    }
}

/// Why a record could not be turned into a [`Course`].
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Neither the record nor its key names a course.
    #[error("course record has an empty code")]
    EmptyCode,
    /// One of the requisite expressions is malformed.
    #[error("course {code} has a malformed {field} expression")]
    Expression {
        /// The course the expression belongs to.
        code: CourseCode,
        /// Which expression is malformed.
        field: &'static str,
        /// The underlying problem.
        #[source]
        source: ExprError,
    },
}

impl CourseRecord {
    /// Converts the record, falling back to `key` when it has no `code`.
    pub fn into_course(self, key: &str) -> Result<Course, RecordError> {
        let code = CourseCode::new(self.code.unwrap_or_else(|| key.trim().to_string()))
            .map_err(|_| RecordError::EmptyCode)?;

        let expression = |raw: RawExpr, field: &'static str| {
            Expr::try_from(raw).map_err(|source| RecordError::Expression {
                code: code.clone(),
                field,
                source,
            })
        };
        let prerequisites = expression(self.preq, "prerequisite")?;
        let corequisites = expression(self.creq, "corequisite")?;
        let exclusions = expression(self.excl, "exclusion")?;

        let notes = Notes {
            prerequisites: self.prer.map(Scalar::into_string),
            corequisites: self.crer.map(Scalar::into_string),
            terms: self.terms.map(Scalar::into_string),
            credits: self.cred.map(Scalar::into_string),
        };

        let mut course = Course::new(code)
            .with_prerequisites(prerequisites)
            .with_corequisites(corequisites)
            .with_exclusions(exclusions)
            .with_notes(notes);
        if let Some(name) = self.name {
            course = course.with_name(name);
        }
        if let Some(description) = self.desc {
            course = course.with_description(description);
        }
        Ok(course)
    }
}
