//! Errors raised while building or reading entities.

use thiserror::Error;

use crate::{entity::Key, rank::Rank};

/// Errors produced by the entity model.
///
/// Construction errors name the member kind and the offending field so that
/// a bad directory row can be found without a debugger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("{kind} member is missing required field `{field}`")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("{kind} member has invalid `{field}` value `{value}`: {reason}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("unknown member status `{status}`")]
    InvalidStatus { status: String },

    #[error("affiliation `{affiliation}` is claimed by more than one member")]
    DuplicateAffiliation { affiliation: String },

    #[error("entity `{key}` has no rank")]
    MissingRankAttribute { key: Key },

    #[error("rank {rank} of entity `{key}` has no neighboring rank")]
    RankOutOfRange { key: Key, rank: Rank },
}
