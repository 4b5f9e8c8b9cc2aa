//! Keyed directed graph of tree entities.
//!
//! [`FamilyGraph`] wraps a petgraph [`StableDiGraph`] with a key index so
//! entities can be looked up, removed and connected by key. Node indices stay
//! valid across removals.
//!
//! Capabilities:
//! - Key uniqueness across every entity kind
//! - Edge endpoints checked on insertion; re-adding an edge replaces its data
//! - Degree and in-degree queries
//! - Weakly connected components, optionally restricted to a node predicate

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::{
    Direction,
    stable_graph::{NodeIndex, StableDiGraph},
};

use snutree_core::entity::{Attributes, Entity, Key};

use crate::{error::TreeError, structure::family::FamilyId};

/// Where an edge came from; selects its default attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Parent relationship between two members.
    Relationship,
    /// Declared in configuration.
    Custom,
    /// From a placeholder parent to its orphan.
    Unknown,
}

/// Node payload: the entity, its own render attributes and its family.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) entity: Entity,
    pub(crate) attributes: Attributes,
    pub(crate) family: Option<FamilyId>,
}

/// Edge payload.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub(crate) kind: EdgeKind,
    pub(crate) attributes: Attributes,
}

#[derive(Debug, Default)]
pub(crate) struct FamilyGraph {
    graph: StableDiGraph<Node, Edge>,
    index: HashMap<Key, NodeIndex>,
}

impl FamilyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Inserts an entity with the attributes it contributes itself.
    pub(crate) fn add_entity(&mut self, entity: Entity) -> Result<(), TreeError> {
        let key = entity.key().to_string();
        if self.index.contains_key(&key) {
            return Err(TreeError::DuplicateEntity { key });
        }

        let attributes = entity.render_attributes();
        let ix = self.graph.add_node(Node {
            entity,
            attributes,
            family: None,
        });
        self.index.insert(key, ix);
        Ok(())
    }

    /// Connects two existing entities. An existing edge between the same
    /// pair is replaced.
    pub(crate) fn add_edge(
        &mut self,
        parent: &str,
        child: &str,
        kind: EdgeKind,
        attributes: Attributes,
    ) -> Result<(), TreeError> {
        let parent_ix = self.index_of(parent)?;
        let child_ix = self.index_of(child)?;
        self.graph
            .update_edge(parent_ix, child_ix, Edge { kind, attributes });
        Ok(())
    }

    pub(crate) fn contains_edge(&self, parent: &str, child: &str) -> bool {
        match (self.index.get(parent), self.index.get(child)) {
            (Some(parent_ix), Some(child_ix)) => self.graph.contains_edge(*parent_ix, *child_ix),
            _ => false,
        }
    }

    /// Removes entities and every edge touching them. Unknown keys are ignored.
    pub(crate) fn remove_entities(&mut self, keys: &[Key]) {
        for key in keys {
            if let Some(ix) = self.index.remove(key) {
                self.graph.remove_node(ix);
            }
        }
    }

    pub(crate) fn node(&self, key: &str) -> Option<&Node> {
        self.index
            .get(key)
            .and_then(|ix| self.graph.node_weight(*ix))
    }

    pub(crate) fn node_mut(&mut self, key: &str) -> Option<&mut Node> {
        let ix = *self.index.get(key)?;
        self.graph.node_weight_mut(ix)
    }

    /// Iterates over nodes in index order.
    pub(crate) fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph
            .node_indices()
            .filter_map(|ix| self.graph.node_weight(ix))
    }

    /// Iterates over `(parent, child, edge)` triples.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (&str, &str, &Edge)> {
        self.graph.edge_indices().filter_map(|ix| {
            let (source, target) = self.graph.edge_endpoints(ix)?;
            Some((
                self.graph[source].entity.key(),
                self.graph[target].entity.key(),
                &self.graph[ix],
            ))
        })
    }

    /// Number of edges touching `key`, in either direction.
    pub(crate) fn degree(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |ix| {
            self.graph.edges_directed(*ix, Direction::Incoming).count()
                + self.graph.edges_directed(*ix, Direction::Outgoing).count()
        })
    }

    pub(crate) fn in_degree(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |ix| {
            self.graph.edges_directed(*ix, Direction::Incoming).count()
        })
    }

    /// Weakly connected components of the subgraph induced by `include`.
    ///
    /// Components are listed in order of their first node; keys within a
    /// component are in discovery order.
    pub(crate) fn weak_components<F>(&self, include: F) -> Vec<Vec<Key>>
    where
        F: Fn(&Node) -> bool,
    {
        let mut seen = HashSet::new();
        let mut components = Vec::new();

        for start in self.graph.node_indices() {
            if seen.contains(&start) || !include(&self.graph[start]) {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            seen.insert(start);

            while let Some(ix) = queue.pop_front() {
                component.push(self.graph[ix].entity.key().to_string());
                for neighbor in self.graph.neighbors_undirected(ix) {
                    if include(&self.graph[neighbor]) && seen.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }

            components.push(component);
        }

        components
    }

    fn index_of(&self, key: &str) -> Result<NodeIndex, TreeError> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| TreeError::UnknownEntity {
                key: key.to_string(),
            })
    }
}
