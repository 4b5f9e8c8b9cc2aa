//! Error adapter for converting SnutreeError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Every error gets a
//! stable code such as `snutree::tree::rank_violation`, and common input
//! mistakes get a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use snutree::{EntityError, SnutreeError, TreeError};
use snutree_reader::ReadError;

/// Adapter for [`SnutreeError`] values.
pub struct ErrorAdapter<'a>(pub &'a SnutreeError);

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            SnutreeError::Io(_) => "snutree::io",
            SnutreeError::Read(err) => read_code(err),
            SnutreeError::Entity(err) => entity_code(err),
            SnutreeError::Tree(err) => tree_code(err),
            SnutreeError::Config(_) => "snutree::config",
            SnutreeError::Export(_) => "snutree::export",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        match self.0 {
            SnutreeError::Read(ReadError::UnsupportedFormat(_)) => {
                Some("input directories must end in .csv or .toml")
            }
            SnutreeError::Tree(TreeError::RankViolation { .. }) => {
                Some("set `layout.semesters = false` to skip rank checks")
            }
            SnutreeError::Tree(TreeError::MixedRankKinds { .. }) => {
                Some("use integer ranks or semesters throughout, not both")
            }
            SnutreeError::Tree(TreeError::UnknownParent { .. }) => {
                Some("every parent must be a member of the directory")
            }
            SnutreeError::Tree(TreeError::Entity(EntityError::MissingRankAttribute { .. }))
            | SnutreeError::Entity(EntityError::MissingRankAttribute { .. }) => {
                Some("give the entity a rank or set `layout.semesters = false`")
            }
            SnutreeError::Export(_) => Some("is Graphviz installed and `dot` on the PATH?"),
            _ => None,
        }
    }
}

fn read_code(err: &ReadError) -> &'static str {
    match err {
        ReadError::Syntax { .. } => "snutree::read::syntax",
        ReadError::RowWidth { .. } => "snutree::read::row_width",
        ReadError::Toml(_) => "snutree::read::toml",
        ReadError::NonScalar { .. } => "snutree::read::non_scalar",
        ReadError::UnsupportedFormat(_) => "snutree::read::unsupported_format",
    }
}

fn entity_code(err: &EntityError) -> &'static str {
    match err {
        EntityError::MissingField { .. } => "snutree::entity::missing_field",
        EntityError::InvalidField { .. } => "snutree::entity::invalid_field",
        EntityError::InvalidStatus { .. } => "snutree::entity::invalid_status",
        EntityError::DuplicateAffiliation { .. } => "snutree::entity::duplicate_affiliation",
        EntityError::MissingRankAttribute { .. } => "snutree::entity::missing_rank",
        EntityError::RankOutOfRange { .. } => "snutree::entity::rank_out_of_range",
    }
}

fn tree_code(err: &TreeError) -> &'static str {
    match err {
        TreeError::DuplicateEntity { .. } => "snutree::tree::duplicate_entity",
        TreeError::UnknownParent { .. } => "snutree::tree::unknown_parent",
        TreeError::UnknownEntity { .. } => "snutree::tree::unknown_entity",
        TreeError::RankViolation { .. } => "snutree::tree::rank_violation",
        TreeError::MixedRankKinds { .. } => "snutree::tree::mixed_rank_kinds",
        TreeError::UnknownEdgeComponent { .. } => "snutree::tree::unknown_edge_component",
        TreeError::FamilyColorConflict { .. } => "snutree::tree::family_color_conflict",
        TreeError::Entity(err) => entity_code(err),
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
