//! Domain models for course requisite trees.
//!
//! This module contains the course catalogue, requirement expressions and
//! their evaluation, and the working set with its closure, layout and status
//! tracking.

mod closure;
/// Course codes and their normalisation.
pub mod code;
mod config;
mod course;
mod database;
mod evaluate;
/// Requirement expressions and their serialized form.
pub mod expr;
mod layout;
/// Seed input parsing.
pub mod seed;
mod status;
mod working_set;

pub use closure::build_closure;
pub use code::CourseCode;
pub use config::{Cascade, Config};
pub use course::{Course, Notes};
pub use database::CourseDatabase;
pub use expr::{Expr, ExprError, Operator, RawExpr};
pub use layout::{Depth, Layout, LayoutError};
pub use seed::{Relation, Seed};
pub use status::{Satisfaction, Status, UnknownStatusError};
pub use working_set::{Entry, Related, WorkingSet};
