//! Family tree assembly and validation.
//!
//! [`FamilyTree::new`] runs the whole construction pipeline in a fixed order:
//!
//! 1. Insert the members
//! 2. Insert custom nodes (`custom_nodes`)
//! 3. Wire member relationships, checking parents and rank order
//! 4. Insert custom edge paths (`custom_edges`)
//! 5. Drop singletons (`no_singletons`)
//! 6. Group families and color them (`family_colors`)
//! 7. Give orphans placeholder parents (`unknowns`)
//!
//! Steps named in parentheses only run when the matching [`LayoutFlags`]
//! flag is set. Construction is all or nothing: the first violated invariant
//! is returned and no tree is produced.
//!
//! [`LayoutFlags`]: crate::config::LayoutFlags

use log::{debug, info, trace};

use snutree_core::{
    entity::{Attributes, CustomEntity, Entity},
    member::Member,
};

use crate::{
    config::TreeConfig,
    error::TreeError,
    structure::{EdgeKind, family::Families, graph::FamilyGraph},
};

/// A validated, decorated family tree.
#[derive(Debug)]
pub struct FamilyTree {
    pub(crate) graph: FamilyGraph,
    pub(crate) families: Families,
    pub(crate) config: TreeConfig,
}

impl FamilyTree {
    /// Builds a tree from `members` under `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] raised by any step, e.g.
    /// [`TreeError::DuplicateEntity`] when two entities share a key or
    /// [`TreeError::RankViolation`] when a member is ranked before its parent.
    pub fn new(members: Vec<Member>, config: &TreeConfig) -> Result<Self, TreeError> {
        info!(members = members.len(), seed = config.seed(); "Building family tree");

        let mut tree = Self {
            graph: FamilyGraph::new(),
            families: Families::default(),
            config: config.clone(),
        };
        let flags = *config.layout();

        tree.run_step(true, "members", |tree| tree.add_members(members))?;
        tree.run_step(flags.custom_nodes, "custom_nodes", Self::add_custom_nodes)?;
        tree.run_step(true, "relationships", Self::add_member_relationships)?;
        tree.run_step(flags.custom_edges, "custom_edges", Self::add_custom_edges)?;
        tree.run_step(flags.no_singletons, "no_singletons", Self::remove_singletons)?;
        tree.run_step(flags.family_colors, "family_colors", |tree| {
            tree.mark_families();
            tree.add_colors()
        })?;
        tree.run_step(flags.unknowns, "unknowns", Self::add_orphan_parents)?;

        info!(
            entities = tree.len(),
            edges = tree.edge_count(),
            families = tree.families.len();
            "Family tree built"
        );
        Ok(tree)
    }

    fn run_step<F>(&mut self, enabled: bool, step: &str, run: F) -> Result<(), TreeError>
    where
        F: FnOnce(&mut Self) -> Result<(), TreeError>,
    {
        if !enabled {
            trace!(step; "Skipping disabled tree step");
            return Ok(());
        }
        debug!(step; "Running tree step");
        run(self)
    }

    fn add_members(&mut self, members: Vec<Member>) -> Result<(), TreeError> {
        for member in members {
            self.graph.add_entity(Entity::from(member))?;
        }
        Ok(())
    }

    fn add_custom_nodes(&mut self) -> Result<(), TreeError> {
        for (key, node) in self.config.nodes() {
            let custom = CustomEntity::new(key.clone(), node.rank(), node.attributes().clone());
            self.graph.add_entity(Entity::from(custom))?;
        }
        Ok(())
    }

    /// Connects every member with a parent to that parent.
    fn add_member_relationships(&mut self) -> Result<(), TreeError> {
        let relationships = self
            .graph
            .nodes()
            .filter_map(|node| {
                let member = node.entity.as_member()?;
                let parent = member.parent()?;
                Some((member.key().to_string(), parent.to_string()))
            })
            .collect::<Vec<_>>();

        for (child, parent) in relationships {
            self.add_relationship(&parent, &child)?;
        }
        Ok(())
    }

    /// Adds the edge `parent -> child` between two entities in the tree.
    ///
    /// When rank validation is on, both ranks must be known and of the same
    /// kind, and the child may not be ranked before its parent.
    fn add_relationship(&mut self, parent: &str, child: &str) -> Result<(), TreeError> {
        let Some(parent_node) = self.graph.node(parent) else {
            return Err(TreeError::UnknownParent {
                child: child.to_string(),
                parent: parent.to_string(),
            });
        };

        if self.config.layout().semesters {
            let child_node = self
                .graph
                .node(child)
                .ok_or_else(|| TreeError::UnknownEntity {
                    key: child.to_string(),
                })?;
            let child_rank = child_node.entity.rank()?;
            let parent_rank = parent_node.entity.rank()?;
            if !child_rank.same_kind(parent_rank) {
                return Err(TreeError::MixedRankKinds {
                    key: child.to_string(),
                    rank: child_rank,
                    expected: parent_rank,
                });
            }
            if child_rank < parent_rank {
                return Err(TreeError::RankViolation {
                    child: child.to_string(),
                    parent: parent.to_string(),
                    child_rank,
                    parent_rank,
                });
            }
        }

        self.graph
            .add_edge(parent, child, EdgeKind::Relationship, Attributes::new())
    }

    /// Adds every configured edge path. All keys of a path are checked before
    /// any of its edges is added.
    fn add_custom_edges(&mut self) -> Result<(), TreeError> {
        for edge in self.config.edges() {
            let path = edge.nodes();
            if let Some(missing) = path.iter().find(|key| !self.graph.contains(key)) {
                return Err(TreeError::UnknownEdgeComponent {
                    path: path.to_vec(),
                    key: missing.clone(),
                });
            }

            for pair in path.windows(2) {
                self.graph.add_edge(
                    &pair[0],
                    &pair[1],
                    EdgeKind::Custom,
                    edge.attributes().clone(),
                )?;
            }
        }
        Ok(())
    }

    /// The configuration the tree was built with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of entities in the tree.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.graph.contains(key)
    }

    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        self.graph.contains_edge(parent, child)
    }

    pub fn entity(&self, key: &str) -> Option<&Entity> {
        self.graph.node(key).map(|node| &node.entity)
    }

    /// Attributes set on the entity itself, without category defaults.
    pub fn attributes(&self, key: &str) -> Option<&Attributes> {
        self.graph.node(key).map(|node| &node.attributes)
    }

    /// Kind of the edge `parent -> child`, if present.
    pub fn edge_kind(&self, parent: &str, child: &str) -> Option<EdgeKind> {
        self.graph
            .edges()
            .find(|(p, c, _)| *p == parent && *c == child)
            .map(|(_, _, edge)| edge.kind)
    }

    /// Color of the family `key` belongs to, once families are colored.
    pub fn family_color(&self, key: &str) -> Option<&str> {
        let family = self.graph.node(key)?.family?;
        self.families.color(family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use snutree_core::{
        EntityError,
        entity::Scalar,
        member::MemberKind,
        rank::Rank,
    };

    use crate::config::{EdgeSpec, NodeSpec};

    fn member(key: &str, rank: Option<i64>, parent: Option<&str>) -> Member {
        Member::new(key, MemberKind::Keyless)
            .with_rank(rank.map(Rank::Integer))
            .with_parent(parent)
    }

    fn bare_config() -> TreeConfig {
        let mut config = TreeConfig::default();
        let layout = config.layout_mut();
        layout.no_singletons = false;
        layout.family_colors = false;
        layout.unknowns = false;
        config
    }

    #[test]
    fn test_relationships_become_edges() {
        let members = vec![
            member("Bob", Some(10), None),
            member("Rob", Some(11), Some("Bob")),
        ];
        let tree = FamilyTree::new(members, &bare_config()).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.edge_count(), 1);
        assert!(tree.contains_edge("Bob", "Rob"));
        assert_eq!(tree.edge_kind("Bob", "Rob"), Some(EdgeKind::Relationship));
    }

    #[test]
    fn test_unknown_parent() {
        let members = vec![member("Rob", Some(11), Some("Nobody"))];

        assert_eq!(
            FamilyTree::new(members, &bare_config()).unwrap_err(),
            TreeError::UnknownParent {
                child: "Rob".to_string(),
                parent: "Nobody".to_string(),
            }
        );
    }

    #[test]
    fn test_rank_check_needs_ranks() {
        let members = vec![member("Bob", None, None), member("Rob", Some(3), Some("Bob"))];

        assert_eq!(
            FamilyTree::new(members.clone(), &bare_config()).unwrap_err(),
            TreeError::Entity(EntityError::MissingRankAttribute {
                key: "Bob".to_string()
            })
        );

        let mut config = bare_config();
        config.layout_mut().semesters = false;
        assert!(FamilyTree::new(members, &config).is_ok());
    }

    #[test]
    fn test_equal_ranks_are_allowed() {
        let members = vec![member("Bob", Some(4), None), member("Rob", Some(4), Some("Bob"))];
        assert!(FamilyTree::new(members, &bare_config()).is_ok());
    }

    #[test]
    fn test_custom_nodes_and_edges() {
        let attributes = Attributes::from([("style".to_string(), Scalar::from("dashed"))]);
        let config = bare_config()
            .with_node("Founders", NodeSpec::new(Some(Rank::Integer(1)), Attributes::new()))
            .with_edge(
                EdgeSpec::new(
                    vec!["Founders".to_string(), "Ann".to_string(), "Ben".to_string()],
                    attributes.clone(),
                )
                .unwrap(),
            );
        let members = vec![member("Ann", Some(2), None), member("Ben", Some(3), None)];

        let tree = FamilyTree::new(members, &config).unwrap();

        assert!(matches!(tree.entity("Founders"), Some(Entity::Custom(_))));
        assert!(tree.contains_edge("Founders", "Ann"));
        assert!(tree.contains_edge("Ann", "Ben"));
        assert_eq!(tree.edge_kind("Ann", "Ben"), Some(EdgeKind::Custom));
    }

    #[test]
    fn test_custom_edge_with_unknown_key() {
        let config = bare_config().with_edge(
            EdgeSpec::new(
                vec!["Ann".to_string(), "Ghost".to_string(), "Ben".to_string()],
                Attributes::new(),
            )
            .unwrap(),
        );
        let members = vec![member("Ann", Some(2), None), member("Ben", Some(3), None)];

        assert_eq!(
            FamilyTree::new(members, &config).unwrap_err(),
            TreeError::UnknownEdgeComponent {
                path: vec!["Ann".to_string(), "Ghost".to_string(), "Ben".to_string()],
                key: "Ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_disabled_custom_steps() {
        let mut config = bare_config()
            .with_node("Founders", NodeSpec::default())
            .with_edge(
                EdgeSpec::new(vec!["Founders".to_string(), "Ghost".to_string()], Attributes::new())
                    .unwrap(),
            );
        config.layout_mut().custom_nodes = false;
        config.layout_mut().custom_edges = false;

        let tree = FamilyTree::new(vec![member("Ann", Some(2), None)], &config).unwrap();

        assert!(!tree.contains("Founders"));
        assert_eq!(tree.edge_count(), 0);
    }

    #[test]
    fn test_custom_node_clashing_with_member() {
        let config = bare_config().with_node("Ann", NodeSpec::default());

        assert_eq!(
            FamilyTree::new(vec![member("Ann", Some(2), None)], &config).unwrap_err(),
            TreeError::DuplicateEntity {
                key: "Ann".to_string()
            }
        );
    }
}
