//! Example: Building a family tree from members
//!
//! This example assembles a tree from members created in code, without
//! reading a directory, and prints the DOT source.

use snutree::{
    TreeBuilder,
    config::{EdgeSpec, NodeSpec, TreeConfig},
    entity::{Attributes, Scalar},
    member::{Member, MemberKind},
    rank::Rank,
};

fn keyed(
    key: &str,
    name: &str,
    parent: Option<&str>,
    semester: &str,
) -> Result<Member, Box<dyn std::error::Error>> {
    let rank: Rank = semester.parse()?;
    Ok(Member::new(
        key,
        MemberKind::Keyed {
            name: name.to_string(),
        },
    )
    .with_parent(parent)
    .with_rank(Some(rank)))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building family tree from members...\n");

    let members = vec![
        keyed("ac", "Ann Carter", None, "Fall 1998")?,
        keyed("bo", "Ben Ortiz", Some("ac"), "Spring 2000")?,
        keyed("cl", "Cara Lee", Some("ac"), "Fall 2000")?,
        keyed("fw", "Finn Walsh", None, "Spring 1999")?,
        keyed("gr", "Gia Russo", Some("fw"), "Fall 1999")?,
    ];

    // A founders node above the oldest family
    let mut founders = Attributes::new();
    founders.insert("label".to_string(), Scalar::from("Founders"));
    founders.insert("shape".to_string(), Scalar::from("box"));

    let mut dashed = Attributes::new();
    dashed.insert("style".to_string(), Scalar::from("dashed"));

    let config = TreeConfig::default()
        .with_seed(12)
        .with_node("Founders", NodeSpec::new(Some("Fall 1997".parse()?), founders))
        .with_edge(EdgeSpec::new(vec!["Founders".to_string(), "ac".to_string()], dashed)?)
        .with_family_color("fw", "forestgreen");

    let builder = TreeBuilder::new(config);
    let tree = builder.build(members)?;

    println!(
        "Tree has {} nodes and {} edges",
        tree.len(),
        tree.edge_count()
    );

    let dot = builder.render_dot(&tree)?;
    println!("\n{dot}");

    Ok(())
}
