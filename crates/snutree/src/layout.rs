//! Deterministic draw order and timeline hints.
//!
//! A [`TreeLayout`] is everything a serializer needs to write a tree: nodes
//! and edges in draw order with their render attributes fully resolved, and
//! an optional [`Timeline`] aligning entities of the same rank.
//!
//! # Node order
//!
//! The weakly connected components of the tree are sorted by their smallest
//! key and then shuffled with a Mersenne Twister seeded from the
//! configuration. The shuffle draws the same numbers as Python's
//! `random.Random(seed).shuffle`, so a seed picks the same order as the
//! Python snutree releases did for the same directory.
//! Keys within a component are emitted in key order.
//!
//! # Edge order
//!
//! Edges are sorted by parent key, child key and then their formatted
//! attributes, independent of component order.
//!
//! # Attribute resolution
//!
//! Later layers win:
//!
//! | item | layers |
//! |------|--------|
//! | tree node | `node_defaults.all`, `node_defaults.member`, own |
//! | tree edge | `edge_defaults.all`, own |
//! | timeline marker | `node_defaults.all`, `node_defaults.semester`, `label` |
//! | timeline edge | `edge_defaults.all`, `edge_defaults.semester` |

use std::collections::BTreeMap;

use log::debug;
use rand_mt::Mt;

use snutree_core::{
    EntityError,
    entity::{Attributes, Key, Scalar, format_attributes},
    rank::Rank,
};

use crate::{error::TreeError, structure::graph::Edge, tree::FamilyTree};

/// Suffix of the left timeline column.
pub const LEFT_COLUMN: &str = "L";

/// Suffix of the right timeline column.
pub const RIGHT_COLUMN: &str = "R";

/// Key of the timeline marker for `rank` in the column with `suffix`.
pub fn marker_key(rank: Rank, suffix: &str) -> Key {
    format!("{rank}{suffix}")
}

fn is_marker(key: &str, rank: Rank) -> bool {
    key == marker_key(rank, LEFT_COLUMN) || key == marker_key(rank, RIGHT_COLUMN)
}

/// A node ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub key: Key,
    pub attributes: Attributes,
}

/// An edge ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    pub parent: Key,
    pub child: Key,
    pub attributes: Attributes,
}

/// One column of rank markers, earliest rank first.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineColumn {
    /// Marker key suffix, [`LEFT_COLUMN`] or [`RIGHT_COLUMN`].
    pub suffix: &'static str,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

/// Keys drawn on the same rank: both markers of the rank and every entity
/// holding it, sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct RankGroup {
    pub rank: Rank,
    pub keys: Vec<Key>,
}

/// Generation alignment hints.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    pub left: TimelineColumn,
    pub right: TimelineColumn,
    /// Same-rank groups in rank order.
    pub ranks: Vec<RankGroup>,
}

/// A fully ordered tree with resolved render attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub graph_attributes: Attributes,
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
    /// Present when rank validation is enabled and the tree is not empty.
    pub timeline: Option<Timeline>,
}

fn merge(layers: &[&Attributes]) -> Attributes {
    layers
        .iter()
        .flat_map(|layer| layer.iter())
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Shuffles `items` in place, swapping from the back like Python's
/// `random.Random(seed).shuffle`.
fn shuffle<T>(items: &mut [T], seed: u64) {
    let mut rng = Mt::new_with_key(seed_key(seed));
    for i in (1..items.len()).rev() {
        let j = random_below(&mut rng, i + 1);
        items.swap(i, j);
    }
}

/// The seed as little-endian 32-bit words, at least one.
fn seed_key(seed: u64) -> Vec<u32> {
    let (low, high) = (seed as u32, (seed >> 32) as u32);
    if high == 0 { vec![low] } else { vec![low, high] }
}

/// Uniform draw from `0..n`: takes as many high bits as `n` has and
/// redraws until the candidate is below `n`.
fn random_below(rng: &mut Mt, n: usize) -> usize {
    let bits = (usize::BITS - n.leading_zeros()).min(u32::BITS);
    loop {
        let candidate = (rng.next_u32() >> (u32::BITS - bits)) as usize;
        if candidate < n {
            return candidate;
        }
    }
}

impl FamilyTree {
    /// Entity keys in draw order.
    pub fn ordered_keys(&self) -> Vec<Key> {
        let mut components = self.graph.weak_components(|_| true);
        for component in &mut components {
            component.sort();
        }
        components.sort_by(|a, b| a.first().cmp(&b.first()));

        shuffle(&mut components, self.config.seed());

        components.into_iter().flatten().collect()
    }

    /// Edges in draw order as `(parent, child, edge)`.
    pub(crate) fn ordered_edges(&self) -> Vec<(&str, &str, &Edge)> {
        let mut edges = self
            .graph
            .edges()
            .map(|(parent, child, edge)| (parent, child, format_attributes(&edge.attributes), edge))
            .collect::<Vec<_>>();
        edges.sort_by(|a, b| (a.0, a.1, &a.2).cmp(&(b.0, b.1, &b.2)));

        edges
            .into_iter()
            .map(|(parent, child, _, edge)| (parent, child, edge))
            .collect()
    }

    /// Groups entities by rank, adding both timeline markers to each group.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Entity`] when an entity has no rank and
    /// [`TreeError::MixedRankKinds`] when integer ranks and semesters are
    /// mixed.
    pub fn rank_groups(&self) -> Result<Vec<RankGroup>, TreeError> {
        let mut groups: BTreeMap<Rank, Vec<Key>> = BTreeMap::new();
        let mut expected: Option<Rank> = None;
        for node in self.graph.nodes() {
            let rank = node.entity.rank()?;
            match expected {
                Some(expected) if !rank.same_kind(expected) => {
                    return Err(TreeError::MixedRankKinds {
                        key: node.entity.key().to_string(),
                        rank,
                        expected,
                    });
                }
                Some(_) => {}
                None => expected = Some(rank),
            }
            groups
                .entry(rank)
                .or_insert_with(|| vec![marker_key(rank, LEFT_COLUMN), marker_key(rank, RIGHT_COLUMN)])
                .push(node.entity.key().to_string());
        }

        Ok(groups
            .into_iter()
            .map(|(rank, mut keys)| {
                keys.sort();
                RankGroup { rank, keys }
            })
            .collect())
    }

    /// Orders the tree and resolves every render attribute.
    ///
    /// # Errors
    ///
    /// When the timeline is requested, fails like [`FamilyTree::rank_groups`]
    /// and with [`EntityError::RankOutOfRange`] when the latest rank has no
    /// successor for the closing marker.
    pub fn layout(&self) -> Result<TreeLayout, TreeError> {
        let node_defaults = self.config.node_defaults();
        let edge_defaults = self.config.edge_defaults();

        let nodes = self
            .ordered_keys()
            .into_iter()
            .filter_map(|key| {
                let node = self.graph.node(&key)?;
                let attributes = merge(&[&node_defaults.all, &node_defaults.member, &node.attributes]);
                Some(LayoutNode { key, attributes })
            })
            .collect::<Vec<_>>();

        let edges = self
            .ordered_edges()
            .into_iter()
            .map(|(parent, child, edge)| LayoutEdge {
                parent: parent.to_string(),
                child: child.to_string(),
                attributes: merge(&[&edge_defaults.all, &edge.attributes]),
            })
            .collect::<Vec<_>>();

        let timeline = if self.config.layout().semesters {
            self.timeline()?
        } else {
            None
        };

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            timeline = timeline.is_some();
            "Tree laid out"
        );

        Ok(TreeLayout {
            graph_attributes: self.config.graph_defaults().all.clone(),
            nodes,
            edges,
            timeline,
        })
    }

    /// The timeline, or `None` for an empty tree.
    fn timeline(&self) -> Result<Option<Timeline>, TreeError> {
        let ranks = self.rank_groups()?;
        let (Some(first), Some(last)) = (ranks.first(), ranks.last()) else {
            return Ok(None);
        };
        let (min, max) = (first.rank, last.rank);
        let end = max.checked_add(1).ok_or_else(|| EntityError::RankOutOfRange {
            key: last
                .keys
                .iter()
                .find(|key| !is_marker(key, max))
                .cloned()
                .unwrap_or_default(),
            rank: max,
        })?;

        Ok(Some(Timeline {
            left: self.timeline_column(LEFT_COLUMN, min, end),
            right: self.timeline_column(RIGHT_COLUMN, min, end),
            ranks,
        }))
    }

    /// Markers from `min` through `end`, joined in rank order.
    fn timeline_column(&self, suffix: &'static str, min: Rank, end: Rank) -> TimelineColumn {
        let node_defaults = self.config.node_defaults();
        let edge_defaults = self.config.edge_defaults();
        let edge_attributes = merge(&[&edge_defaults.all, &edge_defaults.semester]);

        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut next = Some(min);
        while let Some(rank) = next.filter(|rank| *rank <= end) {
            let label = Attributes::from([("label".to_string(), Scalar::String(rank.to_string()))]);
            nodes.push(LayoutNode {
                key: marker_key(rank, suffix),
                attributes: merge(&[&node_defaults.all, &node_defaults.semester, &label]),
            });
            next = rank.checked_add(1);
            if let Some(following) = next.filter(|following| *following <= end) {
                edges.push(LayoutEdge {
                    parent: marker_key(rank, suffix),
                    child: marker_key(following, suffix),
                    attributes: edge_attributes.clone(),
                });
            }
        }

        TimelineColumn {
            suffix,
            nodes,
            edges,
        }
    }
}
