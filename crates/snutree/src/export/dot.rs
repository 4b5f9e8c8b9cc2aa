//! DOT source output.
//!
//! A [`TreeLayout`] becomes a `dot-structures` graph named `family_tree`,
//! printed by `graphviz-rust`. Nodes and edges keep the order of the
//! layout; attribute lists keep the sorted order of [`Attributes`]. Values
//! are quoted unless they are wrapped in `<...>`, which Graphviz reads as an
//! HTML label.

use std::io;

use dot_structures::{Attribute, Edge, EdgeTy, Graph, Id, Node, NodeId, Stmt, Subgraph, Vertex};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use log::trace;

use snutree_core::entity::{Attributes, Scalar};

use crate::{
    export::{Error, Exporter},
    layout::{LayoutEdge, LayoutNode, RankGroup, TimelineColumn, TreeLayout},
};

const GRAPH_NAME: &str = "family_tree";
const MEMBERS_SUBGRAPH: &str = "members";

/// Writes a [`TreeLayout`] as DOT source to any [`io::Write`].
pub struct DotWriter<W> {
    writer: W,
}

impl<W: io::Write> DotWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Exporter for DotWriter<W> {
    fn export_layout(&mut self, layout: &TreeLayout) -> Result<(), Error> {
        let source = to_string(layout);
        trace!(bytes = source.len(); "Writing DOT source");
        self.writer.write_all(source.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Renders a layout as DOT source.
pub fn to_string(layout: &TreeLayout) -> String {
    to_graph(layout).print(&mut PrinterContext::default())
}

/// Builds the DOT graph of a layout.
///
/// Statement order: graph attributes, the left timeline column, the
/// `members` subgraph, the right timeline column, then one `rank=same`
/// group per rank.
pub fn to_graph(layout: &TreeLayout) -> Graph {
    let mut stmts = layout
        .graph_attributes
        .iter()
        .map(|(name, value)| Stmt::Attribute(attribute(name, value)))
        .collect::<Vec<_>>();

    if let Some(timeline) = &layout.timeline {
        stmts.push(column(&timeline.left));
    }
    stmts.push(subgraph(MEMBERS_SUBGRAPH, &layout.nodes, &layout.edges));
    if let Some(timeline) = &layout.timeline {
        stmts.push(column(&timeline.right));
        stmts.extend(timeline.ranks.iter().map(rank_same));
    }

    Graph::DiGraph {
        id: quoted(GRAPH_NAME),
        strict: false,
        stmts,
    }
}

fn column(column: &TimelineColumn) -> Stmt {
    subgraph(&format!("dates{}", column.suffix), &column.nodes, &column.edges)
}

fn subgraph(name: &str, nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Stmt {
    let stmts = nodes
        .iter()
        .map(node)
        .chain(edges.iter().map(edge))
        .collect();
    Stmt::Subgraph(Subgraph {
        id: quoted(name),
        stmts,
    })
}

fn node(node: &LayoutNode) -> Stmt {
    Stmt::Node(Node::new(NodeId(quoted(&node.key), None), attributes(&node.attributes)))
}

fn edge(edge: &LayoutEdge) -> Stmt {
    Stmt::Edge(Edge {
        ty: EdgeTy::Pair(vertex(&edge.parent), vertex(&edge.child)),
        attributes: attributes(&edge.attributes),
    })
}

fn vertex(key: &str) -> Vertex {
    Vertex::N(NodeId(quoted(key), None))
}

/// An anonymous subgraph holding `rank=same` and the group's keys.
fn rank_same(group: &RankGroup) -> Stmt {
    let same = Stmt::Attribute(Attribute(Id::Plain("rank".into()), Id::Plain("same".into())));
    let keys = group
        .keys
        .iter()
        .map(|key| Stmt::Node(Node::new(NodeId(quoted(key), None), Vec::new())));

    Stmt::Subgraph(Subgraph {
        id: Id::Anonymous(String::new()),
        stmts: std::iter::once(same).chain(keys).collect(),
    })
}

fn attributes(attributes: &Attributes) -> Vec<Attribute> {
    attributes
        .iter()
        .map(|(name, value)| attribute(name, value))
        .collect()
}

fn attribute(name: &str, value: &Scalar) -> Attribute {
    Attribute(name_id(name), value_id(value))
}

/// Attribute names stay bare when DOT accepts them as identifiers.
fn name_id(name: &str) -> Id {
    let bare = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if bare {
        Id::Plain(name.to_string())
    } else {
        quoted(name)
    }
}

fn value_id(value: &Scalar) -> Id {
    let text = value.to_string();
    if text.len() > 1 && text.starts_with('<') && text.ends_with('>') {
        Id::Html(text)
    } else {
        quoted(&text)
    }
}

/// A double-quoted DOT string.
///
/// Backslashes are doubled first so a trailing `\` cannot escape the
/// closing quote.
fn quoted(text: &str) -> Id {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    Id::Escaped(format!("\"{escaped}\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    use snutree_core::rank::Rank;

    use crate::layout::Timeline;

    fn layout_node(key: &str, attributes: &[(&str, Scalar)]) -> LayoutNode {
        LayoutNode {
            key: key.to_string(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    fn layout_edge(parent: &str, child: &str) -> LayoutEdge {
        LayoutEdge {
            parent: parent.to_string(),
            child: child.to_string(),
            attributes: Attributes::new(),
        }
    }

    fn escaped(text: &str) -> Id {
        Id::Escaped(text.to_string())
    }

    fn subgraph_named<'a>(graph: &'a Graph, name: &str) -> &'a Subgraph {
        let Graph::DiGraph { stmts, .. } = graph else {
            panic!("not a digraph");
        };
        stmts
            .iter()
            .find_map(|stmt| match stmt {
                Stmt::Subgraph(subgraph) if subgraph.id == quoted(name) => Some(subgraph),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no subgraph `{name}`"))
    }

    fn edge_pairs(subgraph: &Subgraph) -> Vec<(Id, Id)> {
        subgraph
            .stmts
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Edge(Edge {
                    ty: EdgeTy::Pair(Vertex::N(parent), Vertex::N(child)),
                    ..
                }) => Some((parent.0.clone(), child.0.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_plain_graph() {
        let layout = TreeLayout {
            graph_attributes: Attributes::from([("size".to_string(), Scalar::Integer(80))]),
            nodes: vec![
                layout_node("Bob", &[("label", Scalar::from("Bob")), ("color", Scalar::from("red"))]),
                layout_node("Rob", &[]),
            ],
            edges: vec![layout_edge("Bob", "Rob")],
            timeline: None,
        };

        let graph = to_graph(&layout);
        let Graph::DiGraph { id, stmts, .. } = &graph else {
            panic!("not a digraph");
        };
        assert_eq!(id, &escaped("\"family_tree\""));
        assert_eq!(stmts.len(), 2);
        assert_eq!(
            stmts[0],
            Stmt::Attribute(Attribute(Id::Plain("size".into()), escaped("\"80\"")))
        );

        let members = subgraph_named(&graph, "members");
        assert_eq!(
            members.stmts[0],
            Stmt::Node(Node::new(
                NodeId(escaped("\"Bob\""), None),
                vec![
                    Attribute(Id::Plain("color".into()), escaped("\"red\"")),
                    Attribute(Id::Plain("label".into()), escaped("\"Bob\"")),
                ],
            ))
        );
        assert_eq!(
            edge_pairs(members),
            [(escaped("\"Bob\""), escaped("\"Rob\""))]
        );

        let dot = to_string(&layout);
        assert!(dot.starts_with("digraph \"family_tree\""), "{dot}");
        assert!(dot.contains("\"Bob\" -> \"Rob\""), "{dot}");
        assert!(graphviz_rust::parse(&dot).is_ok(), "{dot}");
    }

    #[test]
    fn test_timeline_sections() {
        let column = |suffix: &'static str| TimelineColumn {
            suffix,
            nodes: vec![
                layout_node(&format!("1{suffix}"), &[("label", Scalar::from("1"))]),
                layout_node(&format!("2{suffix}"), &[("label", Scalar::from("2"))]),
            ],
            edges: vec![layout_edge(&format!("1{suffix}"), &format!("2{suffix}"))],
        };
        let layout = TreeLayout {
            graph_attributes: Attributes::new(),
            nodes: vec![layout_node("a", &[])],
            edges: vec![],
            timeline: Some(Timeline {
                left: column("L"),
                right: column("R"),
                ranks: vec![RankGroup {
                    rank: Rank::Integer(1),
                    keys: vec!["1L".to_string(), "1R".to_string(), "a".to_string()],
                }],
            }),
        };

        let graph = to_graph(&layout);
        let Graph::DiGraph { stmts, .. } = &graph else {
            panic!("not a digraph");
        };
        let names = stmts
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Subgraph(subgraph) => Some(subgraph.id.clone()),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                quoted("datesL"),
                quoted("members"),
                quoted("datesR"),
                Id::Anonymous(String::new()),
            ]
        );

        assert_eq!(
            edge_pairs(subgraph_named(&graph, "datesL")),
            [(quoted("1L"), quoted("2L"))]
        );

        let Some(Stmt::Subgraph(rank)) = stmts.last() else {
            panic!("no rank group");
        };
        assert_eq!(
            rank.stmts[0],
            Stmt::Attribute(Attribute(Id::Plain("rank".into()), Id::Plain("same".into())))
        );
        assert_eq!(rank.stmts.len(), 4);

        let dot = to_string(&layout);
        assert!(graphviz_rust::parse(&dot).is_ok(), "{dot}");
    }

    #[test]
    fn test_value_quoting() {
        assert_eq!(value_id(&Scalar::from("<<b>x</b>>")), Id::Html("<<b>x</b>>".into()));
        assert_eq!(value_id(&Scalar::from("<")), escaped("\"<\""));
        assert_eq!(value_id(&Scalar::Boolean(true)), escaped("\"true\""));
        assert_eq!(
            value_id(&Scalar::from("Jon Smith\n\"Jonny\"")),
            escaped("\"Jon Smith\\n\\\"Jonny\\\"\"")
        );
        assert_eq!(name_id("fontname"), Id::Plain("fontname".into()));
        assert_eq!(name_id("2x"), escaped("\"2x\""));
    }

    #[test]
    fn test_backslash_keys_stay_inside_quotes() {
        let layout = TreeLayout {
            graph_attributes: Attributes::new(),
            nodes: vec![
                layout_node("C:\\", &[("label", Scalar::from("ends in \\"))]),
                layout_node("kid", &[]),
            ],
            edges: vec![layout_edge("C:\\", "kid")],
            timeline: None,
        };

        assert_eq!(quoted("C:\\"), escaped("\"C:\\\\\""));

        let dot = to_string(&layout);
        assert!(dot.contains("\"C:\\\\\" -> \"kid\""), "{dot}");
        assert!(graphviz_rust::parse(&dot).is_ok(), "{dot}");
    }

    #[test]
    fn test_writer_exports_to_buffer() {
        let layout = TreeLayout {
            graph_attributes: Attributes::new(),
            nodes: vec![layout_node("a", &[])],
            edges: vec![],
            timeline: None,
        };

        let mut writer = DotWriter::new(Vec::new());
        writer.export_layout(&layout).unwrap();
        let bytes = writer.into_inner();

        assert_eq!(String::from_utf8(bytes).unwrap(), to_string(&layout));
    }
}
