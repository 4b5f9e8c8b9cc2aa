//! Organization members.
//!
//! A [`Member`] is an entity with a display label and an optional parent
//! ("big") reference. The set of member kinds is closed: each [`MemberKind`]
//! decides which fields were required to build it and how its label reads.

use crate::{
    affiliation::Affiliation,
    entity::Key,
    rank::Rank,
};

/// The closed set of member kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    /// A member identified only by name; the name doubles as the key.
    Keyless,
    /// A member with an explicit key and a display name.
    Keyed { name: String },
    /// A chapter in a tree of chapters; the chapter name is the key.
    Chapter,
    /// An initiated member identified by badge number.
    Knight {
        name: String,
        affiliations: Vec<Affiliation>,
    },
    /// A brother of another chapter known only by last name.
    Brother { last_name: String, chapter: String },
    /// A candidate who has not yet been initiated.
    Candidate { name: String, chapter: String },
    /// An expelled member whose name is withheld.
    Expelled,
}

impl MemberKind {
    /// Short human-readable kind name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            MemberKind::Keyless => "keyless",
            MemberKind::Keyed { .. } => "keyed",
            MemberKind::Chapter => "chapter",
            MemberKind::Knight { .. } => "knight",
            MemberKind::Brother { .. } => "brother",
            MemberKind::Candidate { .. } => "candidate",
            MemberKind::Expelled => "expelled",
        }
    }
}

/// An organization member.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    key: Key,
    parent: Option<Key>,
    rank: Option<Rank>,
    kind: MemberKind,
}

impl Member {
    /// Creates a member with no parent and no rank.
    pub fn new(key: impl Into<Key>, kind: MemberKind) -> Self {
        Self {
            key: key.into(),
            parent: None,
            rank: None,
            kind,
        }
    }

    pub fn with_parent(mut self, parent: Option<impl Into<Key>>) -> Self {
        self.parent = parent.map(Into::into);
        self
    }

    pub fn with_rank(mut self, rank: Option<Rank>) -> Self {
        self.rank = rank;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Backfills the parent reference of an orphan.
    pub fn set_parent(&mut self, parent: impl Into<Key>) {
        self.parent = Some(parent.into());
    }

    pub fn rank(&self) -> Option<Rank> {
        self.rank
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// Returns the text drawn inside this member's node.
    pub fn label(&self) -> String {
        match &self.kind {
            MemberKind::Keyless | MemberKind::Chapter => self.key.clone(),
            MemberKind::Keyed { name } => name.clone(),
            MemberKind::Knight { name, affiliations } => {
                let mut sorted = affiliations.iter().collect::<Vec<_>>();
                sorted.sort();
                let affiliations = sorted
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{name}\n{affiliations}")
            }
            MemberKind::Brother { last_name, chapter } => {
                format!("{last_name}\n{chapter} Brother")
            }
            MemberKind::Candidate { name, chapter } => format!("{name}\n{chapter} Candidate"),
            MemberKind::Expelled => format!("Member Expelled\n{}", self.key),
        }
    }
}
