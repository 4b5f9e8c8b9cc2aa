//! Export functionality for family trees.
//!
//! This module turns a [`TreeLayout`] into output. It is the final stage in
//! the snutree processing pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Rows
//!     ↓ schema
//! Members
//!     ↓ assemble + decorate
//! FamilyTree
//!     ↓ layout
//! TreeLayout
//!     ↓ export (this module)
//! DOT text / rendered image
//! ```
//!
//! # Available Backends
//!
//! - [`dot`] - DOT source text via [`dot::DotWriter`], printed by
//!   `graphviz-rust`
//! - `graphviz` - images rendered by the external `dot` program (requires
//!   the `graphviz` feature)
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`SnutreeError::Export`] at the crate
//! boundary.
//!
//! [`SnutreeError::Export`]: crate::SnutreeError::Export

/// DOT export backend.
pub mod dot;

/// External Graphviz renderer.
#[cfg(feature = "graphviz")]
pub mod graphviz;

use crate::layout::TreeLayout;

/// Abstraction for tree export backends.
///
/// Implementors convert a [`TreeLayout`] into a specific output format.
pub trait Exporter {
    /// Exports a laid-out tree to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_layout(&mut self, layout: &TreeLayout) -> Result<(), Error>;
}

/// Errors that can occur during tree export.
///
/// This type is converted into [`SnutreeError::Export`] at the crate
/// boundary via the [`From`] implementation in [`crate::error`].
///
/// [`SnutreeError::Export`]: crate::SnutreeError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
