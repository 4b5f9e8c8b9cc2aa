//! Error types for snutree operations.
//!
//! [`TreeError`] covers every invariant the tree assembly and decoration
//! passes enforce. [`SnutreeError`] is the umbrella type returned by the
//! [`TreeBuilder`](crate::TreeBuilder) API and wraps the errors of every layer.

use std::io;

use thiserror::Error;

use snutree_core::{EntityError, entity::Key, rank::Rank};
use snutree_reader::ReadError;

/// Invariant violations raised while assembling or decorating a tree.
///
/// Every variant aborts the construction; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("duplicate entity key: `{key}`")]
    DuplicateEntity { key: Key },

    #[error("member `{child}` has unknown parent: `{parent}`")]
    UnknownParent { child: Key, parent: Key },

    #[error("edge refers to unknown entity: `{key}`")]
    UnknownEntity { key: Key },

    #[error(
        "rank {child_rank} of member `{child}` cannot be prior to rank of parent `{parent}`: {parent_rank}"
    )]
    RankViolation {
        child: Key,
        parent: Key,
        child_rank: Rank,
        parent_rank: Rank,
    },

    #[error("rank {rank} of `{key}` is not the same kind as rank {expected}")]
    MixedRankKinds {
        key: Key,
        rank: Rank,
        expected: Rank,
    },

    #[error("custom edge path {path:?} has undefined node: `{key}`")]
    UnknownEdgeComponent { path: Vec<Key>, key: Key },

    #[error("family of member `{key}` already assigned a color before `{color}`")]
    FamilyColorConflict { key: Key, color: String },

    #[error(transparent)]
    Entity(#[from] EntityError),
}

/// The main error type for snutree operations.
#[derive(Debug, Error)]
pub enum SnutreeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Read error: {0}")]
    Read(#[from] ReadError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for SnutreeError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
