//! Configuration types for family tree assembly and rendering.
//!
//! All types implement [`serde::Deserialize`] so a tree configuration can be
//! read from a TOML table. Every field has a default, so an empty table is a
//! valid configuration.
//!
//! # Overview
//!
//! - [`TreeConfig`] - Top-level tree configuration.
//! - [`LayoutFlags`] - Toggles for the optional assembly and decoration steps.
//! - [`NodeSpec`] / [`EdgeSpec`] - Custom nodes and edge paths.
//! - [`GraphDefaults`], [`NodeDefaults`], [`EdgeDefaults`] - Default render
//!   attributes per category.
//!
//! # Example
//!
//! ```
//! # use snutree::config::TreeConfig;
//! let config: TreeConfig = toml::from_str(
//!     r#"
//!     seed = 12
//!
//!     [layout]
//!     unknowns = false
//!
//!     [[edges]]
//!     nodes = ["Founders", "Ann", "Ben"]
//!     attributes = { style = "dashed" }
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.seed(), 12);
//! assert!(!config.layout().unknowns);
//! assert!(config.layout().semesters);
//! assert_eq!(config.edges()[0].nodes().len(), 3);
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use snutree_core::{
    entity::{Attributes, Key},
    rank::Rank,
};

/// Seed used for the component shuffle when none is configured.
pub const DEFAULT_SEED: u64 = 71;

fn enabled() -> bool {
    true
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Top-level tree configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    /// Optional step toggles.
    #[serde(default)]
    layout: LayoutFlags,

    /// Seed for the component shuffle.
    #[serde(default = "default_seed")]
    seed: u64,

    /// Dropped singletons at or after this rank are reported.
    #[serde(default)]
    warn_rank: Option<Rank>,

    /// Explicit family colors, by member key.
    #[serde(default)]
    family_colors: IndexMap<Key, String>,

    /// Custom nodes, by key.
    #[serde(default)]
    nodes: IndexMap<Key, NodeSpec>,

    /// Custom edge paths.
    #[serde(default)]
    edges: Vec<EdgeSpec>,

    #[serde(default)]
    graph_defaults: GraphDefaults,

    #[serde(default)]
    node_defaults: NodeDefaults,

    #[serde(default)]
    edge_defaults: EdgeDefaults,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            layout: LayoutFlags::default(),
            seed: DEFAULT_SEED,
            warn_rank: None,
            family_colors: IndexMap::new(),
            nodes: IndexMap::new(),
            edges: Vec::new(),
            graph_defaults: GraphDefaults::default(),
            node_defaults: NodeDefaults::default(),
            edge_defaults: EdgeDefaults::default(),
        }
    }
}

impl TreeConfig {
    pub fn layout(&self) -> &LayoutFlags {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutFlags {
        &mut self.layout
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn warn_rank(&self) -> Option<Rank> {
        self.warn_rank
    }

    pub fn family_colors(&self) -> &IndexMap<Key, String> {
        &self.family_colors
    }

    /// Assigns an explicit color to the family of `key`.
    pub fn with_family_color(mut self, key: impl Into<Key>, color: impl Into<String>) -> Self {
        self.family_colors.insert(key.into(), color.into());
        self
    }

    pub fn nodes(&self) -> &IndexMap<Key, NodeSpec> {
        &self.nodes
    }

    /// Declares a custom node.
    pub fn with_node(mut self, key: impl Into<Key>, node: NodeSpec) -> Self {
        self.nodes.insert(key.into(), node);
        self
    }

    pub fn edges(&self) -> &[EdgeSpec] {
        &self.edges
    }

    /// Declares a custom edge path.
    pub fn with_edge(mut self, edge: EdgeSpec) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn graph_defaults(&self) -> &GraphDefaults {
        &self.graph_defaults
    }

    pub fn node_defaults(&self) -> &NodeDefaults {
        &self.node_defaults
    }

    pub fn edge_defaults(&self) -> &EdgeDefaults {
        &self.edge_defaults
    }
}

/// Toggles for the optional steps of tree construction.
///
/// All flags default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutFlags {
    /// Validate rank ordering and draw a timeline.
    #[serde(default = "enabled")]
    pub semesters: bool,

    #[serde(default = "enabled")]
    pub custom_edges: bool,

    #[serde(default = "enabled")]
    pub custom_nodes: bool,

    /// Drop members with no edges at all.
    #[serde(default = "enabled")]
    pub no_singletons: bool,

    /// Group members into families and color them.
    #[serde(default = "enabled")]
    pub family_colors: bool,

    /// Give every orphaned member a placeholder parent.
    #[serde(default = "enabled")]
    pub unknowns: bool,
}

impl Default for LayoutFlags {
    fn default() -> Self {
        Self {
            semesters: true,
            custom_edges: true,
            custom_nodes: true,
            no_singletons: true,
            family_colors: true,
            unknowns: true,
        }
    }
}

/// A custom node declared in configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    #[serde(default)]
    rank: Option<Rank>,

    #[serde(default)]
    attributes: Attributes,
}

impl NodeSpec {
    pub fn new(rank: Option<Rank>, attributes: Attributes) -> Self {
        Self { rank, attributes }
    }

    pub fn rank(&self) -> Option<Rank> {
        self.rank
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// A path of at least two node keys, joined by edges in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Key>")]
pub struct NodePath(Vec<Key>);

impl NodePath {
    pub fn keys(&self) -> &[Key] {
        &self.0
    }
}

impl TryFrom<Vec<Key>> for NodePath {
    type Error = String;

    fn try_from(keys: Vec<Key>) -> Result<Self, Self::Error> {
        if keys.len() < 2 {
            return Err(format!(
                "an edge path needs at least two nodes, found {}",
                keys.len()
            ));
        }
        Ok(Self(keys))
    }
}

/// A custom edge path declared in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    nodes: NodePath,

    #[serde(default)]
    attributes: Attributes,
}

impl EdgeSpec {
    /// Creates an edge path.
    ///
    /// # Errors
    ///
    /// Returns a message when `nodes` has fewer than two keys.
    pub fn new(nodes: Vec<Key>, attributes: Attributes) -> Result<Self, String> {
        Ok(Self {
            nodes: NodePath::try_from(nodes)?,
            attributes,
        })
    }

    pub fn nodes(&self) -> &[Key] {
        self.nodes.keys()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Default graph attributes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDefaults {
    #[serde(default)]
    pub all: Attributes,
}

/// Default node attributes, by node category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefaults {
    /// Every node.
    #[serde(default)]
    pub all: Attributes,

    /// Member nodes.
    #[serde(default)]
    pub member: Attributes,

    /// Placeholder parents of orphans.
    #[serde(default)]
    pub unknown: Attributes,

    /// Timeline markers.
    #[serde(default)]
    pub semester: Attributes,
}

/// Default edge attributes, by edge category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDefaults {
    #[serde(default)]
    pub all: Attributes,

    /// Edges from placeholder parents.
    #[serde(default)]
    pub unknown: Attributes,

    /// Edges between timeline markers.
    #[serde(default)]
    pub semester: Attributes,
}
