//! Graph storage for family trees.
//!
//! [`graph::FamilyGraph`] owns every entity and edge of a tree, keyed by
//! entity key. [`family::Families`] is the arena of family records shared by
//! the members of one weakly connected component.

pub(crate) mod family;
pub(crate) mod graph;

pub use family::FamilyId;
pub use graph::EdgeKind;
