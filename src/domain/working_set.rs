//! The courses currently in scope, with their depth and status.
//!
//! A [`WorkingSet`] is rebuilt wholesale from a [`Seed`]: the closure of the
//! seed's fresh codes is computed, the seed's done codes are added on top, and
//! the result is laid out and evaluated. Manual "done" markings survive a
//! rebuild for every course still in scope.
//!
//! Statuses are then kept up to date in place as courses are toggled.

use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroUsize,
};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{
    Course, CourseCode, CourseDatabase, Depth, Layout, LayoutError, Satisfaction, Seed, Status,
    build_closure,
};

/// A course in the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Entry {
    depth: Depth,
    status: Status,
    done: bool,
}

impl Entry {
    /// The layer the course is drawn in.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// The derived status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Whether the course is manually marked as taken.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}

/// The courses in scope, keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkingSet {
    entries: BTreeMap<CourseCode, Entry>,
}

/// The courses in a working set related to one course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Related<'a> {
    /// Prerequisites in the working set.
    pub prerequisites: Vec<&'a CourseCode>,
    /// Corequisites in the working set.
    pub corequisites: Vec<&'a CourseCode>,
    /// Credit exclusions in the working set.
    pub exclusions: Vec<&'a CourseCode>,
    /// Courses in the working set that require this one.
    pub dependents: Vec<&'a CourseCode>,
}

impl WorkingSet {
    /// Builds a working set from scratch.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the courses cannot be layered.
    pub fn build(
        db: &CourseDatabase,
        seed: &Seed,
        max_passes: Option<NonZeroUsize>,
    ) -> Result<Self, LayoutError> {
        Self::default().rebuild(db, seed, max_passes)
    }

    /// Builds a new working set from a seed, carrying over the done markings
    /// of this one.
    ///
    /// The seed's fresh codes are closed over their requisites; its done codes
    /// are added as they are, marked done. Unknown codes are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the courses cannot be layered.
    #[instrument(skip_all, fields(fresh = seed.fresh().len(), done = seed.done().len()))]
    pub fn rebuild(
        &self,
        db: &CourseDatabase,
        seed: &Seed,
        max_passes: Option<NonZeroUsize>,
    ) -> Result<Self, LayoutError> {
        let mut next = Self::default();
        for code in build_closure(db, seed.fresh()) {
            let done = self.is_done(&code).unwrap_or(false);
            next.insert(code, done);
        }
        for code in seed.done() {
            if let Some(code) = db.code(code) {
                next.insert(code.clone(), true);
            }
        }

        let codes: BTreeSet<CourseCode> = next.entries.keys().cloned().collect();
        let depths = Layout::new(db)
            .with_max_passes(max_passes)
            .assign_depths(&codes)?;
        for (code, depth) in depths {
            if let Some(entry) = next.entries.get_mut(&code) {
                entry.depth = depth;
            }
        }

        next.refresh_all(db);
        debug!(courses = next.len(), "built working set");
        Ok(next)
    }

    /// Adds a course with no depth, replacing any existing entry.
    pub(crate) fn insert(&mut self, code: CourseCode, done: bool) {
        let status = if done { Status::Done } else { Status::None };
        self.entries.insert(
            code,
            Entry {
                depth: Depth::UNASSIGNED,
                status,
                done,
            },
        );
    }

    /// Looks up a course.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Entry> {
        self.entries.get(code)
    }

    /// Whether the course is in the working set.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Whether the course is marked done, or `None` if it is not in the
    /// working set.
    #[must_use]
    pub fn is_done(&self, code: &str) -> Option<bool> {
        self.entries.get(code).map(Entry::is_done)
    }

    /// The status of a course in the working set.
    #[must_use]
    pub fn status(&self, code: &str) -> Option<Status> {
        self.entries.get(code).map(Entry::status)
    }

    /// The depth of a course in the working set.
    #[must_use]
    pub fn depth(&self, code: &str) -> Option<Depth> {
        self.entries.get(code).map(Entry::depth)
    }

    /// The number of courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the working set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the courses in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CourseCode, &Entry)> + '_ {
        self.entries.iter()
    }

    /// Groups the courses by depth, shallowest first, each layer in code
    /// order.
    #[must_use]
    pub fn layers(&self) -> BTreeMap<Depth, Vec<&CourseCode>> {
        let mut layers: BTreeMap<Depth, Vec<&CourseCode>> = BTreeMap::new();
        for (code, entry) in &self.entries {
            layers.entry(entry.depth).or_default().push(code);
        }
        layers
    }

    /// Recomputes the status of one course from its requisites.
    ///
    /// Courses marked done keep the `done` status. Unknown codes are ignored.
    pub fn update_status(&mut self, db: &CourseDatabase, code: &str) {
        let Some(entry) = self.entries.get(code) else {
            return;
        };
        let status = if entry.done {
            Status::Done
        } else if let Some(course) = db.get(code) {
            self.derive_status(course)
        } else {
            return;
        };

        if let Some(entry) = self.entries.get_mut(code) {
            entry.status = status;
        }
    }

    /// Flips the done marking of a course, then recomputes its status and
    /// the status of each of its direct dependents in the working set.
    ///
    /// Requirements only look at whether their courses are marked done, never
    /// at derived statuses, so dependents of dependents cannot go stale.
    /// Courses that list this one as a credit exclusion are not dependents
    /// and are left as they were; use [`refresh_all`](Self::refresh_all) to
    /// bring them up to date.
    ///
    /// Returns the new marking, or `None` if the course is not in the working
    /// set.
    pub fn toggle_done(&mut self, db: &CourseDatabase, code: &str) -> Option<bool> {
        let entry = self.entries.get_mut(code)?;
        entry.done = !entry.done;
        let done = entry.done;
        debug!(code, done, "toggled course");

        self.update_status(db, code);
        if let Some(course) = db.get(code) {
            for dependent in course.dependents() {
                if self.contains(dependent) {
                    self.update_status(db, dependent);
                }
            }
        }
        Some(done)
    }

    /// Re-evaluates every course until no status changes.
    ///
    /// Returns the number of statuses that changed.
    pub fn refresh_all(&mut self, db: &CourseDatabase) -> usize {
        let codes: Vec<CourseCode> = self.entries.keys().cloned().collect();
        let mut changed = 0;

        // Statuses only read done markings, so the second pass is the last;
        // the cap guards against that ever changing.
        for _ in 0..=codes.len() {
            let mut changed_this_pass = 0;
            for code in &codes {
                let before = self.status(code);
                self.update_status(db, code);
                if self.status(code) != before {
                    changed_this_pass += 1;
                }
            }
            changed += changed_this_pass;
            if changed_this_pass == 0 {
                break;
            }
        }
        changed
    }

    /// The courses in the working set related to the given course.
    #[must_use]
    pub fn related<'a>(&'a self, db: &'a CourseDatabase, code: &str) -> Option<Related<'a>> {
        let course = db.get(code)?;
        let in_set = |codes: &'a BTreeSet<CourseCode>| -> Vec<&'a CourseCode> {
            codes.iter().filter(|code| self.contains(code)).collect()
        };
        Some(Related {
            prerequisites: in_set(course.flattened_prerequisites()),
            corequisites: in_set(course.flattened_corequisites()),
            exclusions: in_set(course.flattened_exclusions()),
            dependents: in_set(course.dependents()),
        })
    }

    fn derive_status(&self, course: &Course) -> Status {
        let has_exclusions = !course.exclusions().is_empty();
        let exclusions = course.exclusions().evaluate(self);
        let prerequisites = course.prerequisites().evaluate(self);
        let corequisites = course.corequisites().evaluate(self);

        if has_exclusions && exclusions == Satisfaction::Done {
            Status::Excl
        } else if prerequisites == Satisfaction::None {
            Status::Preq
        } else if corequisites == Satisfaction::None {
            Status::Creq
        } else if prerequisites == Satisfaction::Done && corequisites == Satisfaction::Done {
            if !has_exclusions || exclusions == Satisfaction::None {
                Status::None
            } else {
                Status::Xout
            }
        } else {
            Status::Outs
        }
    }
}
