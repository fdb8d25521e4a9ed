//! Course prerequisite trees
//!
//! Courses carry boolean prerequisite, corequisite and exclusion rules. Given
//! a few course codes, the crate gathers every course they depend on into a
//! working set, arranges it in layers by prerequisite depth, and tracks which
//! courses can be taken as courses are marked done.

pub mod domain;
pub use domain::{
    Config, Course, CourseCode, CourseDatabase, Depth, Expr, Layout, LayoutError, Seed, Status,
    WorkingSet,
};

/// Loading course databases from disk.
pub mod storage;
pub use storage::{LoadError, load_database};
