use std::collections::BTreeSet;

use crate::domain::{CourseCode, Expr};

/// Literal display text that replaces the generated lists in a course
/// summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    /// Replaces the joined prerequisite list.
    pub prerequisites: Option<String>,
    /// Replaces the joined corequisite list.
    pub corequisites: Option<String>,
    /// Terms the course is offered in.
    pub terms: Option<String>,
    /// Credit value.
    pub credits: Option<String>,
}

/// A course and its requisite rules.
///
/// The `flattened_*` sets and the dependents are derived by
/// [`CourseDatabase`](crate::CourseDatabase) when the course is loaded, and
/// are empty until then.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    code: CourseCode,
    name: Option<String>,
    description: Option<String>,
    prerequisites: Expr,
    corequisites: Expr,
    exclusions: Expr,
    notes: Notes,

    flattened_prerequisites: BTreeSet<CourseCode>,
    flattened_corequisites: BTreeSet<CourseCode>,
    flattened_exclusions: BTreeSet<CourseCode>,
    dependents: BTreeSet<CourseCode>,
}

impl Course {
    /// Creates a course with no requisites.
    #[must_use]
    pub fn new(code: CourseCode) -> Self {
        Self {
            code,
            name: None,
            description: None,
            prerequisites: Expr::default(),
            corequisites: Expr::default(),
            exclusions: Expr::default(),
            notes: Notes::default(),
            flattened_prerequisites: BTreeSet::new(),
            flattened_corequisites: BTreeSet::new(),
            flattened_exclusions: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }

    /// Sets the course title.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the course description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the prerequisite expression.
    #[must_use]
    pub fn with_prerequisites(mut self, expr: Expr) -> Self {
        self.prerequisites = expr;
        self
    }

    /// Sets the corequisite expression.
    #[must_use]
    pub fn with_corequisites(mut self, expr: Expr) -> Self {
        self.corequisites = expr;
        self
    }

    /// Sets the credit exclusion expression.
    #[must_use]
    pub fn with_exclusions(mut self, expr: Expr) -> Self {
        self.exclusions = expr;
        self
    }

    /// Sets the literal display text.
    #[must_use]
    pub fn with_notes(mut self, notes: Notes) -> Self {
        self.notes = notes;
        self
    }

    /// The course code.
    #[must_use]
    pub const fn code(&self) -> &CourseCode {
        &self.code
    }

    /// The course title, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The course description, if known.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Courses that must be completed before this one.
    #[must_use]
    pub const fn prerequisites(&self) -> &Expr {
        &self.prerequisites
    }

    /// Courses that must be completed before or alongside this one.
    #[must_use]
    pub const fn corequisites(&self) -> &Expr {
        &self.corequisites
    }

    /// Courses that cannot be credited together with this one.
    #[must_use]
    pub const fn exclusions(&self) -> &Expr {
        &self.exclusions
    }

    /// Literal display text.
    #[must_use]
    pub const fn notes(&self) -> &Notes {
        &self.notes
    }

    /// Known courses mentioned in the prerequisites.
    #[must_use]
    pub const fn flattened_prerequisites(&self) -> &BTreeSet<CourseCode> {
        &self.flattened_prerequisites
    }

    /// Known courses mentioned in the corequisites.
    #[must_use]
    pub const fn flattened_corequisites(&self) -> &BTreeSet<CourseCode> {
        &self.flattened_corequisites
    }

    /// Known courses mentioned in the exclusions.
    #[must_use]
    pub const fn flattened_exclusions(&self) -> &BTreeSet<CourseCode> {
        &self.flattened_exclusions
    }

    /// Known courses that list this one as a prerequisite or corequisite.
    #[must_use]
    pub const fn dependents(&self) -> &BTreeSet<CourseCode> {
        &self.dependents
    }

    /// Known prerequisites and corequisites together.
    pub fn requisites(&self) -> impl Iterator<Item = &CourseCode> + '_ {
        self.flattened_prerequisites
            .iter()
            .chain(&self.flattened_corequisites)
    }

    /// Paragraphs of text describing the course.
    ///
    /// The first paragraph is the code and title. Requisite lines use the
    /// literal note text when there is some, and the joined flattened codes
    /// otherwise. Empty lines are skipped.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let mut paragraphs = Vec::new();
        paragraphs.push(self.name.as_ref().map_or_else(
            || self.code.to_string(),
            |name| format!("{}: {name}", self.code),
        ));
        if let Some(description) = &self.description {
            paragraphs.push(description.clone());
        }

        let lines = [
            (
                "Prereqs: ",
                self.notes.prerequisites.as_deref(),
                Some(&self.flattened_prerequisites),
            ),
            (
                "Coreqs: ",
                self.notes.corequisites.as_deref(),
                Some(&self.flattened_corequisites),
            ),
            ("Exclusions: ", None, Some(&self.flattened_exclusions)),
            ("Required by: ", None, Some(&self.dependents)),
            ("Terms: ", self.notes.terms.as_deref(), None),
            ("Credits: ", self.notes.credits.as_deref(), None),
        ];

        for (label, note, codes) in lines {
            if let Some(note) = note.filter(|note| !note.is_empty()) {
                paragraphs.push(format!("{label}{note}"));
            } else if let Some(codes) = codes.filter(|codes| !codes.is_empty()) {
                let joined: Vec<&str> = codes.iter().map(CourseCode::as_str).collect();
                paragraphs.push(format!("{label}{}", joined.join(", ")));
            }
        }

        paragraphs
    }

    pub(crate) fn resolve(&mut self, known: impl Fn(&CourseCode) -> bool) {
        self.flattened_prerequisites = self.prerequisites.flatten(&known);
        self.flattened_corequisites = self.corequisites.flatten(&known);
        self.flattened_exclusions = self.exclusions.flatten(&known);
    }

    pub(crate) fn set_dependents(&mut self, dependents: BTreeSet<CourseCode>) {
        self.dependents = dependents;
    }
}
