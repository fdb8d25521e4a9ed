//! Topological layering of a working set.
//!
//! Courses are placed in layers by the length of their prerequisite chain
//! inside the working set. A course sits strictly below every prerequisite,
//! while corequisites that can be placed together share a layer.
//!
//! Layers are assigned in passes. Pass `d` first collects every unplaced course
//! whose prerequisites were all placed in earlier passes, and parks it at the
//! provisional half-depth `d - 0.5`. A course that still has a corequisite with
//! no depth at all is then pulled back out, repeatedly, since pulling one
//! course out can strand the courses coupled to it. Whatever survives is
//! promoted to depth `d`.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    num::NonZeroUsize,
};

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{CourseCode, CourseDatabase};

/// A layer index, kept in half steps.
///
/// Zero means unassigned. Whole values are final layers; values ending in
/// `.5` mark a course provisionally coupled to the layer being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Depth(u32);

impl Depth {
    /// No depth has been assigned.
    pub const UNASSIGNED: Self = Self(0);

    /// The whole layer `n`.
    #[must_use]
    pub const fn layer(n: u32) -> Self {
        Self(n.saturating_mul(2))
    }

    /// The provisional half-depth `n - 0.5`.
    #[must_use]
    pub const fn provisional(n: u32) -> Self {
        Self(n.saturating_mul(2).saturating_sub(1))
    }

    /// Whether a depth has been assigned.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }

    /// Whether this is a half-depth.
    #[must_use]
    pub const fn is_provisional(self) -> bool {
        self.0 % 2 == 1
    }

    /// The whole layer at or below this depth.
    #[must_use]
    pub const fn floor(self) -> u32 {
        self.0 / 2
    }

    /// The depth as a number.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_provisional() {
            write!(f, "{}.5", self.floor())
        } else {
            write!(f, "{}", self.floor())
        }
    }
}

impl Serialize for Depth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if self.is_provisional() {
            serializer.serialize_f64(self.as_f64())
        } else {
            serializer.serialize_u32(self.floor())
        }
    }
}

/// Errors that can occur when laying out a working set.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    /// Some courses can never be placed, because their requisites depend on
    /// each other.
    #[error(
        "{} course(s) could not be laid out; unresolvable requisite cycle(s): {}",
        .unresolved.len(),
        format_cycles(.cycles)
    )]
    Unresolved {
        /// Courses left without a depth.
        unresolved: Vec<CourseCode>,
        /// Requisite cycles among the unplaced courses.
        cycles: Vec<Vec<CourseCode>>,
    },
    /// The configured pass limit was reached before every course was placed.
    #[error("layout stopped after {limit} passes with {} course(s) unplaced", .unresolved.len())]
    PassLimit {
        /// The pass limit.
        limit: usize,
        /// Courses left without a depth.
        unresolved: Vec<CourseCode>,
    },
}

fn format_cycles(cycles: &[Vec<CourseCode>]) -> String {
    if cycles.is_empty() {
        return "none found".to_string();
    }
    cycles
        .iter()
        .map(|cycle| {
            let codes: Vec<&str> = cycle.iter().map(CourseCode::as_str).collect();
            format!("[{}]", codes.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// In-set requisite edges of a single course.
#[derive(Debug, Default)]
struct Edges<'a> {
    prerequisites: Vec<&'a CourseCode>,
    corequisites: Vec<&'a CourseCode>,
}

/// Assigns depths to the courses of a working set.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    db: &'a CourseDatabase,
    max_passes: Option<NonZeroUsize>,
}

impl<'a> Layout<'a> {
    /// Creates a layout engine over the given database.
    ///
    /// By default the number of passes is capped at one more than the number
    /// of courses being placed, which is always enough unless placement stalls.
    #[must_use]
    pub const fn new(db: &'a CourseDatabase) -> Self {
        Self {
            db,
            max_passes: None,
        }
    }

    /// Overrides the pass cap.
    #[must_use]
    pub const fn with_max_passes(mut self, max_passes: Option<NonZeroUsize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Assigns a whole-layer depth to every code.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Unresolved`] when a pass places nothing while
    /// courses remain, which only happens when requisites form a cycle, and
    /// [`LayoutError::PassLimit`] when the pass cap is reached first.
    #[instrument(skip_all, fields(courses = codes.len()))]
    pub fn assign_depths(
        &self,
        codes: &BTreeSet<CourseCode>,
    ) -> Result<BTreeMap<CourseCode, Depth>, LayoutError> {
        let edges = self.in_set_edges(codes);
        let mut depths: BTreeMap<&CourseCode, Depth> =
            codes.iter().map(|code| (code, Depth::UNASSIGNED)).collect();
        let mut unresolved: BTreeSet<&CourseCode> = codes.iter().collect();

        let limit = self
            .max_passes
            .map_or(codes.len().saturating_add(1), NonZeroUsize::get);

        let mut passes = 0;
        let mut layer: u32 = 0;
        while !unresolved.is_empty() {
            if passes == limit {
                return Err(LayoutError::PassLimit {
                    limit,
                    unresolved: unresolved.into_iter().cloned().collect(),
                });
            }
            passes += 1;
            layer += 1;

            let placed = place_layer(layer, &edges, &mut depths, &unresolved);
            debug!(layer, placed = placed.len(), "layout pass");

            if placed.is_empty() {
                let found = cycles(&edges, &unresolved);
                return Err(LayoutError::Unresolved {
                    unresolved: unresolved.into_iter().cloned().collect(),
                    cycles: found,
                });
            }
            for code in placed {
                unresolved.remove(code);
            }
        }

        Ok(depths
            .into_iter()
            .map(|(code, depth)| (code.clone(), depth))
            .collect())
    }

    fn in_set_edges<'c>(
        &self,
        codes: &'c BTreeSet<CourseCode>,
    ) -> BTreeMap<&'c CourseCode, Edges<'c>> {
        let in_set = |requisites: &BTreeSet<CourseCode>| -> Vec<&'c CourseCode> {
            requisites
                .iter()
                .filter_map(|requisite| codes.get(requisite))
                .collect()
        };

        codes
            .iter()
            .map(|code| {
                let edges = self.db.get(code).map_or_else(Edges::default, |course| Edges {
                    prerequisites: in_set(course.flattened_prerequisites()),
                    corequisites: in_set(course.flattened_corequisites()),
                });
                (code, edges)
            })
            .collect()
    }
}

/// Runs one pass, returning the courses placed at `layer`.
fn place_layer<'c>(
    layer: u32,
    edges: &BTreeMap<&'c CourseCode, Edges<'c>>,
    depths: &mut BTreeMap<&'c CourseCode, Depth>,
    unresolved: &BTreeSet<&'c CourseCode>,
) -> Vec<&'c CourseCode> {
    let whole = Depth::layer(layer);
    let ready = |code: &&CourseCode| -> bool {
        edges[*code].prerequisites.iter().all(|prerequisite| {
            let depth = depths[*prerequisite];
            depth.is_assigned() && !depth.is_provisional() && depth < whole
        })
    };
    let mut candidates: Vec<&CourseCode> = unresolved.iter().copied().filter(ready).collect();

    for &code in &candidates {
        depths.insert(code, Depth::provisional(layer));
    }

    loop {
        let (stranded, coupled): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|code| {
            edges[*code]
                .corequisites
                .iter()
                .any(|corequisite| !depths[*corequisite].is_assigned())
        });
        candidates = coupled;
        if stranded.is_empty() {
            break;
        }
        for code in stranded {
            depths.insert(code, Depth::UNASSIGNED);
        }
    }

    for &code in &candidates {
        depths.insert(code, whole);
    }
    candidates
}

/// Requisite cycles among the unplaced courses, each sorted, in sorted order.
fn cycles<'c>(
    edges: &BTreeMap<&'c CourseCode, Edges<'c>>,
    unresolved: &BTreeSet<&'c CourseCode>,
) -> Vec<Vec<CourseCode>> {
    let mut graph: DiGraphMap<&CourseCode, ()> = DiGraphMap::new();
    for &code in unresolved {
        graph.add_node(code);
        let course_edges = &edges[code];
        let targets = course_edges
            .prerequisites
            .iter()
            .chain(&course_edges.corequisites);
        for &target in targets {
            if unresolved.contains(target) {
                graph.add_edge(code, target, ());
            }
        }
    }

    let mut cycles = Vec::new();
    for component in tarjan_scc(&graph) {
        let is_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&node| graph.contains_edge(node, node));
        if is_cycle {
            let mut codes: Vec<CourseCode> = component.into_iter().cloned().collect();
            codes.sort();
            cycles.push(codes);
        }
    }
    cycles.sort();
    cycles
}
