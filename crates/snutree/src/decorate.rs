//! Decoration passes run after the tree is assembled.

use log::{debug, warn};

use snutree_core::entity::{Entity, Key, Placeholder, Scalar};

use crate::{color::ColorPicker, error::TreeError, structure::EdgeKind, tree::FamilyTree};

impl FamilyTree {
    /// Removes every member with no edges at all.
    pub(crate) fn remove_singletons(&mut self) -> Result<(), TreeError> {
        let singletons = self
            .graph
            .nodes()
            .filter(|node| node.entity.is_member() && self.graph.degree(node.entity.key()) == 0)
            .map(|node| node.entity.key().to_string())
            .collect::<Vec<Key>>();

        if let Some(warn_rank) = self.config.warn_rank() {
            for key in &singletons {
                let rank = self.graph.node(key).and_then(|node| node.entity.known_rank());
                match rank {
                    Some(rank) if rank >= warn_rank => {
                        warn!(key, rank:%; "Dropping singleton member");
                    }
                    _ => {}
                }
            }
        }

        debug!(removed = singletons.len(); "Removed singleton members");
        self.graph.remove_entities(&singletons);
        Ok(())
    }

    /// Groups members into families: the weakly connected components of the
    /// member-only subgraph.
    pub(crate) fn mark_families(&mut self) {
        self.families.clear();

        let components = self.graph.weak_components(|node| node.entity.is_member());
        for component in components {
            let family = self.families.create();
            for key in component {
                if let Some(node) = self.graph.node_mut(&key) {
                    node.family = Some(family);
                }
            }
        }

        debug!(families = self.families.len(); "Marked families");
    }

    /// Colors every family, honoring configured colors first.
    ///
    /// Families without a configured color draw from the palette while their
    /// members are visited in key order, so identical input always yields
    /// identical colors.
    pub(crate) fn add_colors(&mut self) -> Result<(), TreeError> {
        let mut picker = ColorPicker::graphviz();

        for (key, color) in self.config.family_colors() {
            let Some(node) = self.graph.node(key) else {
                warn!(key; "Family color map includes nonexistent member");
                continue;
            };
            let Some(family) = node.family else {
                warn!(key; "Family color map includes an entity outside any family");
                continue;
            };

            if self.families.color(family).is_some() {
                return Err(TreeError::FamilyColorConflict {
                    key: key.clone(),
                    color: color.clone(),
                });
            }

            picker.use_color(color);
            self.families.set_color(family, color.clone());
        }

        let mut members = self
            .graph
            .nodes()
            .filter_map(|node| Some((node.entity.key().to_string(), node.family?)))
            .collect::<Vec<_>>();
        members.sort();

        for (key, family) in members {
            let color = match self.families.color(family) {
                Some(color) => color.to_string(),
                None => {
                    let Some(color) = picker.next_color() else {
                        continue;
                    };
                    self.families.set_color(family, color.clone());
                    color
                }
            };

            if let Some(node) = self.graph.node_mut(&key) {
                node.attributes
                    .insert("color".to_string(), Scalar::String(color));
            }
        }
        Ok(())
    }

    /// Gives every member without a parent edge a placeholder parent one rank
    /// earlier.
    pub(crate) fn add_orphan_parents(&mut self) -> Result<(), TreeError> {
        let orphans = self
            .graph
            .nodes()
            .filter(|node| node.entity.is_member() && self.graph.in_degree(node.entity.key()) == 0)
            .map(|node| (node.entity.key().to_string(), node.entity.known_rank()))
            .collect::<Vec<_>>();

        for (key, rank) in &orphans {
            let placeholder = Entity::from(Placeholder::for_orphan(key, *rank)?);
            let parent = placeholder.key().to_string();

            if let Some(member) = self
                .graph
                .node_mut(key)
                .and_then(|node| node.entity.as_member_mut())
            {
                member.set_parent(parent.clone());
            }

            self.graph.add_entity(placeholder)?;
            if let Some(node) = self.graph.node_mut(&parent) {
                node.attributes
                    .extend(self.config.node_defaults().unknown.clone());
            }
            self.graph.add_edge(
                &parent,
                key,
                EdgeKind::Unknown,
                self.config.edge_defaults().unknown.clone(),
            )?;
        }

        debug!(orphans = orphans.len(); "Added placeholder parents");
        Ok(())
    }
}
