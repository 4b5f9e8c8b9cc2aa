//! Snutree - Big-little family trees drawn with Graphviz.
//!
//! Reads member directories, assembles them into a validated family tree,
//! decorates the tree with families, colors and placeholder parents, and
//! writes it out in a deterministic order as DOT source.

pub mod config;
pub mod export;
pub mod layout;

mod color;
mod decorate;
mod error;
mod structure;
mod tree;

pub use snutree_core::{EntityError, affiliation, entity, member, names, rank, schema};
pub use snutree_reader::Format;

pub use error::{SnutreeError, TreeError};
pub use structure::{EdgeKind, FamilyId};
pub use tree::FamilyTree;

use std::io;

use log::{debug, info, trace};

use snutree_core::{member::Member, schema::Schema};

use config::TreeConfig;
use export::{Exporter, dot::DotWriter};

/// Builder for reading, assembling and rendering family trees.
///
/// # Examples
///
/// ```rust
/// use snutree::{Format, TreeBuilder, config::TreeConfig, schema::Schema};
///
/// let source = "name,big_name,pledge_semester\n\
///               Ann,,Fall 2000\n\
///               Ben,Ann,Spring 2001\n";
///
/// let builder = TreeBuilder::new(TreeConfig::default());
///
/// // Read the directory into members
/// let members = builder.read_members(source, Format::Csv, &Schema::Basic)
///     .expect("Failed to read members");
///
/// // Assemble and decorate the tree
/// let tree = builder.build(members)
///     .expect("Failed to build tree");
///
/// // Write DOT source
/// let dot = builder.render_dot(&tree)
///     .expect("Failed to render");
/// assert!(dot.starts_with("digraph \"family_tree\""));
/// assert!(dot.contains("\"Ann\" -> \"Ben\""));
/// ```
#[derive(Default)]
pub struct TreeBuilder {
    config: TreeConfig,
}

impl TreeBuilder {
    /// Create a new tree builder with the given configuration.
    pub fn new(config: TreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Read a member directory.
    ///
    /// # Arguments
    ///
    /// * `source` - Directory text
    /// * `format` - Format of `source`
    /// * `schema` - Shape of each record
    ///
    /// # Errors
    ///
    /// Returns `SnutreeError` for syntax errors in `source` or records the
    /// schema rejects.
    pub fn read_members(
        &self,
        source: &str,
        format: Format,
        schema: &Schema,
    ) -> Result<Vec<Member>, SnutreeError> {
        info!(format:?, schema:% = schema; "Reading members");

        let rows = snutree_reader::read_rows(source, format)?;
        let members = schema.members_from_rows(&rows)?;

        debug!(members = members.len(); "Members read successfully");
        Ok(members)
    }

    /// Assemble, validate and decorate a tree.
    ///
    /// # Errors
    ///
    /// Returns `SnutreeError::Tree` for the first violated tree invariant.
    pub fn build(&self, members: Vec<Member>) -> Result<FamilyTree, SnutreeError> {
        let tree = FamilyTree::new(members, &self.config)?;
        trace!(tree:?; "Built tree");
        Ok(tree)
    }

    /// Write a tree as DOT source to `writer`.
    ///
    /// # Errors
    ///
    /// Returns `SnutreeError` when the timeline needs a rank an entity does
    /// not have, or when writing fails.
    pub fn write_dot<W: io::Write>(
        &self,
        tree: &FamilyTree,
        writer: W,
    ) -> Result<W, SnutreeError> {
        info!(entities = tree.len(); "Rendering DOT");

        let layout = tree.layout()?;
        let mut exporter = DotWriter::new(writer);
        exporter.export_layout(&layout)?;

        info!(
            nodes = layout.nodes.len(),
            edges = layout.edges.len();
            "DOT rendered successfully"
        );
        Ok(exporter.into_inner())
    }

    /// Render a tree as DOT source.
    ///
    /// # Errors
    ///
    /// Same as [`TreeBuilder::write_dot`].
    pub fn render_dot(&self, tree: &FamilyTree) -> Result<String, SnutreeError> {
        let bytes = self.write_dot(tree, Vec::new())?;
        let source = String::from_utf8(bytes)
            .map_err(|err| export::Error::Render(err.to_string()))?;
        Ok(source)
    }

    /// Render a tree to an image with Graphviz.
    ///
    /// # Arguments
    ///
    /// * `tree` - The tree to render
    /// * `extension` - An output file extension such as `pdf` or `png`
    ///
    /// # Errors
    ///
    /// Returns `SnutreeError::Export` when Graphviz cannot be run or fails.
    #[cfg(feature = "graphviz")]
    pub fn render_image(
        &self,
        tree: &FamilyTree,
        extension: &str,
    ) -> Result<Vec<u8>, SnutreeError> {
        let source = self.render_dot(tree)?;
        Ok(export::graphviz::render(&source, extension)?)
    }
}
