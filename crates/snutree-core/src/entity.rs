//! Drawable entities and their render attributes.
//!
//! Every node in a family tree is an [`Entity`]. Members come from the
//! directory, custom entities come from configuration, and placeholders are
//! synthesized for members whose parent is unknown. All of them share one
//! contract: a unique key, an optional rank and a map of render attributes.

use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

use crate::{error::EntityError, member::Member, rank::Rank};

/// Unique identifier of an entity within one tree.
pub type Key = String;

/// Render attributes, kept sorted by name.
pub type Attributes = BTreeMap<String, Scalar>;

/// A scalar render attribute value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

/// Formats attributes as `{name: value, ...}` in name order.
pub fn format_attributes(attributes: &Attributes) -> String {
    let body = attributes
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{body}}}")
}

/// A node declared directly in configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEntity {
    key: Key,
    rank: Option<Rank>,
    attributes: Attributes,
}

impl CustomEntity {
    pub fn new(key: impl Into<Key>, rank: Option<Rank>, attributes: Attributes) -> Self {
        Self {
            key: key.into(),
            rank,
            attributes,
        }
    }
}

/// A synthetic stand-in for the unknown parent of an orphaned member.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    key: Key,
    rank: Option<Rank>,
}

impl Placeholder {
    /// Creates the placeholder parent for the member with key `child` and
    /// rank `child_rank`, one rank earlier when that rank is known.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::RankOutOfRange`] when `child_rank` is the
    /// earliest representable rank.
    pub fn for_orphan(child: &str, child_rank: Option<Rank>) -> Result<Self, EntityError> {
        let rank = child_rank
            .map(|rank| {
                rank.checked_sub(1).ok_or_else(|| EntityError::RankOutOfRange {
                    key: child.to_string(),
                    rank,
                })
            })
            .transpose()?;
        Ok(Self {
            key: format!("{child} Parent"),
            rank,
        })
    }
}

/// Any drawable node of a family tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Member(Member),
    Custom(CustomEntity),
    Placeholder(Placeholder),
}

impl Entity {
    pub fn key(&self) -> &str {
        match self {
            Entity::Member(member) => member.key(),
            Entity::Custom(custom) => &custom.key,
            Entity::Placeholder(placeholder) => &placeholder.key,
        }
    }

    /// Returns the rank, failing when it was never set.
    pub fn rank(&self) -> Result<Rank, EntityError> {
        self.known_rank()
            .ok_or_else(|| EntityError::MissingRankAttribute {
                key: self.key().to_string(),
            })
    }

    pub fn known_rank(&self) -> Option<Rank> {
        match self {
            Entity::Member(member) => member.rank(),
            Entity::Custom(custom) => custom.rank,
            Entity::Placeholder(placeholder) => placeholder.rank,
        }
    }

    /// Attributes contributed by the entity itself, before any defaults.
    pub fn render_attributes(&self) -> Attributes {
        match self {
            Entity::Member(member) => {
                Attributes::from([("label".to_string(), Scalar::String(member.label()))])
            }
            Entity::Custom(custom) => custom.attributes.clone(),
            Entity::Placeholder(_) => Attributes::new(),
        }
    }

    pub fn as_member(&self) -> Option<&Member> {
        match self {
            Entity::Member(member) => Some(member),
            _ => None,
        }
    }

    pub fn as_member_mut(&mut self) -> Option<&mut Member> {
        match self {
            Entity::Member(member) => Some(member),
            _ => None,
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, Entity::Member(_))
    }
}

impl From<Member> for Entity {
    fn from(member: Member) -> Self {
        Entity::Member(member)
    }
}

impl From<CustomEntity> for Entity {
    fn from(custom: CustomEntity) -> Self {
        Entity::Custom(custom)
    }
}

impl From<Placeholder> for Entity {
    fn from(placeholder: Placeholder) -> Self {
        Entity::Placeholder(placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use float_cmp::approx_eq;

    use crate::{member::MemberKind, rank::Semester};

    #[test]
    fn test_missing_rank_is_an_error() {
        let entity = Entity::from(CustomEntity::new("Ghost", None, Attributes::new()));

        assert_eq!(
            entity.rank(),
            Err(EntityError::MissingRankAttribute {
                key: "Ghost".to_string()
            })
        );
        assert_eq!(entity.known_rank(), None);
    }

    #[test]
    fn test_placeholder_rank_is_one_earlier() {
        let fall: Semester = "Fall 2000".parse().unwrap();
        let placeholder = Placeholder::for_orphan("Bob", Some(Rank::Semester(fall))).unwrap();
        let entity = Entity::from(placeholder);

        assert_eq!(entity.key(), "Bob Parent");
        assert_eq!(entity.rank().unwrap().to_string(), "Spring 2000");
        assert!(entity.render_attributes().is_empty());
    }

    #[test]
    fn test_placeholder_for_unranked_orphan() {
        let entity = Entity::from(Placeholder::for_orphan("Bob", None).unwrap());
        assert!(entity.rank().is_err());
    }

    #[test]
    fn test_placeholder_before_earliest_rank() {
        let rank = Rank::Integer(i64::MIN);
        assert_eq!(
            Placeholder::for_orphan("Bob", Some(rank)),
            Err(EntityError::RankOutOfRange {
                key: "Bob".to_string(),
                rank,
            })
        );
    }

    #[test]
    fn test_member_attributes_carry_label() {
        let member = Member::new("b1", MemberKind::Keyed {
            name: "Bob Smith".to_string(),
        });
        let entity = Entity::from(member);

        assert!(entity.is_member());
        assert_eq!(
            entity.render_attributes().get("label"),
            Some(&Scalar::from("Bob Smith"))
        );
    }

    #[test]
    fn test_format_attributes_sorted() {
        let attributes = Attributes::from([
            ("style".to_string(), Scalar::from("filled")),
            ("color".to_string(), Scalar::from("red")),
            ("penwidth".to_string(), Scalar::from(2.5)),
        ]);

        assert_eq!(
            format_attributes(&attributes),
            "{color: red, penwidth: 2.5, style: filled}"
        );
        assert_eq!(format_attributes(&Attributes::new()), "{}");
    }

    #[test]
    fn test_scalar_float() {
        let Scalar::Float(x) = Scalar::from(0.1 + 0.2) else {
            panic!("expected float");
        };
        assert!(approx_eq!(f64, x, 0.3, ulps = 2));
    }
}
