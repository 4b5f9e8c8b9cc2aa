//! Conversion of directory rows into members.
//!
//! A [`Schema`] knows which columns a directory provides and turns each
//! [`Row`] into a [`Member`] of the right kind. Cells are trimmed and blank
//! cells count as absent.
//!
//! # Example
//!
//! ```
//! # use snutree_core::schema::{Row, Schema};
//! let row = Row::from([
//!     ("name".to_string(), "Jane Doe".to_string()),
//!     ("big_name".to_string(), "".to_string()),
//!     ("pledge_semester".to_string(), "Fall 2000".to_string()),
//! ]);
//!
//! let members = Schema::Basic.members_from_rows(&[row]).unwrap();
//! assert_eq!(members[0].key(), "Jane Doe");
//! assert_eq!(members[0].parent(), None);
//! ```

use std::{collections::HashSet, fmt, str::FromStr};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    affiliation::{Affiliation, parse_designation},
    error::EntityError,
    member::{Member, MemberKind},
    names::combine_names,
    rank::{Rank, Semester},
};

/// One directory record: column name to cell text, in column order.
pub type Row = IndexMap<String, String>;

/// The shape of a member directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// `name`, `big_name`, `pledge_semester`
    Basic,
    /// `key`, `name`, `big_key`, `pledge_semester`
    Keyed,
    /// `child`, `mother`, `founded`
    Chapter,
    /// Sigma Nu directories, keyed by badge and drawn for `chapter`.
    SigmaNu { chapter: String },
}

impl Schema {
    /// Builds the `sigmanu` schema, normalizing the primary chapter name.
    pub fn sigma_nu(chapter: &str) -> Result<Self, EntityError> {
        let chapter = parse_designation(chapter).map_err(|err| EntityError::InvalidField {
            kind: "schema",
            field: "chapter",
            value: chapter.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Schema::SigmaNu { chapter })
    }

    /// Converts every row into a member.
    ///
    /// Synthetic keys for brothers and candidates are numbered from one,
    /// separately for each call.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] for the first row with a missing or malformed
    /// field, an unknown status, or an affiliation claimed twice.
    pub fn members_from_rows(&self, rows: &[Row]) -> Result<Vec<Member>, EntityError> {
        debug!(schema:% = self, rows = rows.len(); "Building members");

        let mut members = Vec::with_capacity(rows.len());
        match self {
            Schema::Basic => {
                for row in rows {
                    members.push(keyless_member(row)?);
                }
            }
            Schema::Keyed => {
                for row in rows {
                    members.push(keyed_member(row)?);
                }
            }
            Schema::Chapter => {
                for row in rows {
                    members.push(chapter_member(row)?);
                }
            }
            Schema::SigmaNu { chapter } => {
                let mut directory = SigmaNuDirectory::new(chapter);
                for row in rows {
                    if let Some(member) = directory.member(row)? {
                        members.push(member);
                    }
                }
            }
        }

        Ok(members)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Basic => write!(f, "basic"),
            Schema::Keyed => write!(f, "keyed"),
            Schema::Chapter => write!(f, "chapter"),
            Schema::SigmaNu { chapter } => write!(f, "sigmanu ({chapter})"),
        }
    }
}

/// Looks up a cell, treating blank text as absent.
fn field<'a>(row: &'a Row, name: &str) -> Option<&'a str> {
    row.get(name).map(|value| value.trim()).filter(|v| !v.is_empty())
}

fn required<'a>(
    row: &'a Row,
    kind: &'static str,
    name: &'static str,
) -> Result<&'a str, EntityError> {
    field(row, name).ok_or(EntityError::MissingField { kind, field: name })
}

fn parse_field<T>(
    row: &Row,
    kind: &'static str,
    name: &'static str,
) -> Result<Option<T>, EntityError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    field(row, name)
        .map(|value| {
            value.parse::<T>().map_err(|err| EntityError::InvalidField {
                kind,
                field: name,
                value: value.to_string(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn semester(row: &Row, kind: &'static str) -> Result<Option<Rank>, EntityError> {
    Ok(parse_field::<Semester>(row, kind, "pledge_semester")?.map(Rank::Semester))
}

fn badge<'a>(
    row: &'a Row,
    kind: &'static str,
    name: &'static str,
) -> Result<Option<&'a str>, EntityError> {
    match field(row, name) {
        Some(value) if !value.bytes().all(|b| b.is_ascii_digit()) => {
            Err(EntityError::InvalidField {
                kind,
                field: name,
                value: value.to_string(),
                reason: "badge numbers contain only digits".to_string(),
            })
        }
        value => Ok(value),
    }
}

fn keyless_member(row: &Row) -> Result<Member, EntityError> {
    const KIND: &str = "keyless";
    let name = required(row, KIND, "name")?;
    required(row, KIND, "pledge_semester")?;

    Ok(Member::new(name, MemberKind::Keyless)
        .with_parent(field(row, "big_name"))
        .with_rank(semester(row, KIND)?))
}

fn keyed_member(row: &Row) -> Result<Member, EntityError> {
    const KIND: &str = "keyed";
    let key = required(row, KIND, "key")?;
    let name = required(row, KIND, "name")?;
    required(row, KIND, "pledge_semester")?;

    Ok(Member::new(
        key,
        MemberKind::Keyed {
            name: name.to_string(),
        },
    )
    .with_parent(field(row, "big_key"))
    .with_rank(semester(row, KIND)?))
}

fn chapter_member(row: &Row) -> Result<Member, EntityError> {
    const KIND: &str = "chapter";
    let child = required(row, KIND, "child")?;
    required(row, KIND, "founded")?;
    let founded = parse_field::<i64>(row, KIND, "founded")?;

    Ok(Member::new(child, MemberKind::Chapter)
        .with_parent(field(row, "mother"))
        .with_rank(founded.map(Rank::Integer)))
}

/// Per-call state of a Sigma Nu directory conversion.
struct SigmaNuDirectory<'a> {
    chapter: &'a str,
    brothers: usize,
    candidates: usize,
    claimed: HashSet<(String, u64)>,
}

impl<'a> SigmaNuDirectory<'a> {
    fn new(chapter: &'a str) -> Self {
        Self {
            chapter,
            brothers: 0,
            candidates: 0,
            claimed: HashSet::new(),
        }
    }

    fn member(&mut self, row: &Row) -> Result<Option<Member>, EntityError> {
        let status = required(row, "sigmanu", "status")?;
        let member = match status {
            "Active" | "Alumni" | "Left School" => self.knight(row)?,
            "Brother" => self.brother(row)?,
            "Candidate" => self.candidate(row)?,
            "Expelled" => self.expelled(row)?,
            "Reaffiliate" => {
                trace!(row:?; "Skipping reaffiliate");
                return Ok(None);
            }
            _ => {
                return Err(EntityError::InvalidStatus {
                    status: status.to_string(),
                });
            }
        };
        Ok(Some(member))
    }

    fn knight(&mut self, row: &Row) -> Result<Member, EntityError> {
        const KIND: &str = "knight";
        let key = required_badge(row, KIND)?;
        let first = required(row, KIND, "first_name")?;
        let last = required(row, KIND, "last_name")?;
        let name = combine_names(first, field(row, "preferred_name"), last);
        let affiliations = self.affiliations(row, KIND, Some(key))?;

        Ok(Member::new(key, MemberKind::Knight { name, affiliations })
            .with_parent(badge(row, KIND, "big_badge")?)
            .with_rank(semester(row, KIND)?))
    }

    fn brother(&mut self, row: &Row) -> Result<Member, EntityError> {
        const KIND: &str = "brother";
        let last = required(row, KIND, "last_name")?;
        reject_affiliations(row, KIND)?;
        self.brothers += 1;

        Ok(Member::new(
            format!("Brother {}", self.brothers),
            MemberKind::Brother {
                last_name: last.to_string(),
                chapter: self.chapter.to_string(),
            },
        )
        .with_parent(badge(row, KIND, "big_badge")?)
        .with_rank(semester(row, KIND)?))
    }

    fn candidate(&mut self, row: &Row) -> Result<Member, EntityError> {
        const KIND: &str = "candidate";
        let first = required(row, KIND, "first_name")?;
        let last = required(row, KIND, "last_name")?;
        reject_affiliations(row, KIND)?;
        self.candidates += 1;

        Ok(Member::new(
            format!("Candidate {}", self.candidates),
            MemberKind::Candidate {
                name: combine_names(first, field(row, "preferred_name"), last),
                chapter: self.chapter.to_string(),
            },
        )
        .with_parent(badge(row, KIND, "big_badge")?)
        .with_rank(semester(row, KIND)?))
    }

    fn expelled(&mut self, row: &Row) -> Result<Member, EntityError> {
        const KIND: &str = "expelled";
        let key = required_badge(row, KIND)?;
        // Claimed for duplicate detection only, never drawn.
        self.affiliations(row, KIND, Some(key))?;

        Ok(Member::new(key, MemberKind::Expelled)
            .with_parent(badge(row, KIND, "big_badge")?)
            .with_rank(semester(row, KIND)?))
    }

    /// Parses the `affiliations` cell, adds the primary chapter affiliation
    /// for `own_badge` and claims each one across the directory.
    fn affiliations(
        &mut self,
        row: &Row,
        kind: &'static str,
        own_badge: Option<&str>,
    ) -> Result<Vec<Affiliation>, EntityError> {
        let mut affiliations = Vec::new();

        if let Some(text) = field(row, "affiliations") {
            for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                let affiliation = Affiliation::parse(item, self.chapter).map_err(|err| {
                    EntityError::InvalidField {
                        kind,
                        field: "affiliations",
                        value: item.to_string(),
                        reason: err.to_string(),
                    }
                })?;
                affiliations.push(affiliation);
            }
        }

        if let Some(badge) = own_badge.and_then(|b| b.parse::<u64>().ok()) {
            affiliations.push(Affiliation::new(self.chapter, badge, true));
        }

        affiliations.sort();
        affiliations.dedup();

        for affiliation in &affiliations {
            let claim = (affiliation.designation().to_string(), affiliation.badge());
            if !self.claimed.insert(claim) {
                return Err(EntityError::DuplicateAffiliation {
                    affiliation: affiliation.to_string(),
                });
            }
        }

        Ok(affiliations)
    }
}

fn required_badge<'a>(row: &'a Row, kind: &'static str) -> Result<&'a str, EntityError> {
    badge(row, kind, "badge")?.ok_or(EntityError::MissingField {
        kind,
        field: "badge",
    })
}

fn reject_affiliations(row: &Row, kind: &'static str) -> Result<(), EntityError> {
    match field(row, "affiliations") {
        Some(value) => Err(EntityError::InvalidField {
            kind,
            field: "affiliations",
            value: value.to_string(),
            reason: format!("{kind} members may not list affiliations"),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> Row {
        cells
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_basic_schema() {
        let rows = [
            row(&[("name", "Ann"), ("big_name", ""), ("pledge_semester", "Fall 2000")]),
            row(&[("name", "Ben"), ("big_name", "Ann"), ("pledge_semester", "Spring 2001")]),
        ];
        let members = Schema::Basic.members_from_rows(&rows).unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].parent(), None);
        assert_eq!(members[1].parent(), Some("Ann"));
        assert_eq!(members[1].rank().unwrap().to_string(), "Spring 2001");
    }

    #[test]
    fn test_basic_schema_missing_semester() {
        let rows = [row(&[("name", "Ann"), ("pledge_semester", "  ")])];
        assert_eq!(
            Schema::Basic.members_from_rows(&rows),
            Err(EntityError::MissingField {
                kind: "keyless",
                field: "pledge_semester"
            })
        );
    }

    #[test]
    fn test_keyed_schema_invalid_semester() {
        let rows = [row(&[
            ("key", "a1"),
            ("name", "Ann"),
            ("pledge_semester", "Winter 2000"),
        ])];
        let err = Schema::Keyed.members_from_rows(&rows).unwrap_err();
        assert!(matches!(
            err,
            EntityError::InvalidField {
                field: "pledge_semester",
                ..
            }
        ));
    }

    #[test]
    fn test_chapter_schema() {
        let rows = [row(&[("child", "Beta"), ("mother", "Alpha"), ("founded", "1869")])];
        let members = Schema::Chapter.members_from_rows(&rows).unwrap();

        assert_eq!(members[0].key(), "Beta");
        assert_eq!(members[0].parent(), Some("Alpha"));
        assert_eq!(members[0].rank(), Some(Rank::Integer(1869)));
        assert_eq!(members[0].label(), "Beta");
    }

    #[test]
    fn test_sigma_nu_kinds_and_counters() {
        let schema = Schema::sigma_nu("Delta Alpha").unwrap();
        let rows = [
            row(&[
                ("status", "Active"),
                ("badge", "1000"),
                ("first_name", "Jane"),
                ("last_name", "Smith"),
                ("affiliations", "Eta Mu 12"),
                ("pledge_semester", "Fall 2000"),
            ]),
            row(&[("status", "Brother"), ("last_name", "Jones"), ("big_badge", "1000")]),
            row(&[("status", "Brother"), ("last_name", "Brown")]),
            row(&[("status", "Candidate"), ("first_name", "Al"), ("last_name", "Ng")]),
            row(&[("status", "Reaffiliate"), ("badge", "77")]),
            row(&[("status", "Expelled"), ("badge", "1001")]),
        ];
        let members = schema.members_from_rows(&rows).unwrap();
        let keys = members.iter().map(Member::key).collect::<Vec<_>>();

        assert_eq!(keys, ["1000", "Brother 1", "Brother 2", "Candidate 1", "1001"]);
        assert_eq!(members[0].label(), "Jane Smith\nΔΑ 1000, ΗΜ 12");
        assert_eq!(members[1].parent(), Some("1000"));
        assert_eq!(members[1].label(), "Jones\nΔΑ Brother");
        assert_eq!(members[3].label(), "Al Ng\nΔΑ Candidate");
        assert_eq!(members[4].label(), "Member Expelled\n1001");

        // Counters start over for every call.
        let again = schema.members_from_rows(&rows[1..2]).unwrap();
        assert_eq!(again[0].key(), "Brother 1");
    }

    #[test]
    fn test_sigma_nu_unknown_status() {
        let schema = Schema::sigma_nu("ΔΑ").unwrap();
        let rows = [row(&[("status", "Pledge"), ("badge", "1")])];
        assert_eq!(
            schema.members_from_rows(&rows),
            Err(EntityError::InvalidStatus {
                status: "Pledge".to_string()
            })
        );
    }

    #[test]
    fn test_sigma_nu_duplicate_affiliation() {
        let schema = Schema::sigma_nu("ΔΑ").unwrap();
        let rows = [
            row(&[
                ("status", "Alumni"),
                ("badge", "1"),
                ("first_name", "A"),
                ("last_name", "B"),
                ("affiliations", "HM 5"),
            ]),
            row(&[
                ("status", "Alumni"),
                ("badge", "2"),
                ("first_name", "C"),
                ("last_name", "D"),
                ("affiliations", "Eta Mu 5"),
            ]),
        ];
        assert_eq!(
            schema.members_from_rows(&rows),
            Err(EntityError::DuplicateAffiliation {
                affiliation: "ΗΜ 5".to_string()
            })
        );
    }

    #[test]
    fn test_sigma_nu_brother_with_affiliations() {
        let schema = Schema::sigma_nu("ΔΑ").unwrap();
        let rows = [row(&[
            ("status", "Brother"),
            ("last_name", "Jones"),
            ("affiliations", "ΗΜ 5"),
        ])];
        assert!(matches!(
            schema.members_from_rows(&rows),
            Err(EntityError::InvalidField {
                kind: "brother",
                field: "affiliations",
                ..
            })
        ));
    }

    #[test]
    fn test_sigma_nu_badge_must_be_digits() {
        let schema = Schema::sigma_nu("ΔΑ").unwrap();
        let rows = [row(&[
            ("status", "Active"),
            ("badge", "12a"),
            ("first_name", "A"),
            ("last_name", "B"),
        ])];
        assert!(matches!(
            schema.members_from_rows(&rows),
            Err(EntityError::InvalidField { field: "badge", .. })
        ));
    }

    #[test]
    fn test_sigma_nu_rejects_unknown_chapter() {
        assert!(Schema::sigma_nu("Delta Q").is_err());
    }
}
