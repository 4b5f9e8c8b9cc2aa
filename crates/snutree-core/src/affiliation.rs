//! Chapter affiliations.
//!
//! An affiliation is a chapter designation paired with the badge number a
//! member holds in that chapter, written `"<chapter> <badge>"`. Chapters may
//! be spelled with English letter names (`Delta Alpha 1234`) or as a compact
//! designation (`ΔA 1234`). Latin capitals that look like Greek ones are
//! accepted in designations and normalized to Greek.

use std::{cmp::Ordering, fmt};

use thiserror::Error;

const LETTER_NAMES: [(&str, char); 24] = [
    ("Alpha", 'Α'),
    ("Beta", 'Β'),
    ("Gamma", 'Γ'),
    ("Delta", 'Δ'),
    ("Epsilon", 'Ε'),
    ("Zeta", 'Ζ'),
    ("Eta", 'Η'),
    ("Theta", 'Θ'),
    ("Iota", 'Ι'),
    ("Kappa", 'Κ'),
    ("Lambda", 'Λ'),
    ("Mu", 'Μ'),
    ("Nu", 'Ν'),
    ("Xi", 'Ξ'),
    ("Omicron", 'Ο'),
    ("Pi", 'Π'),
    ("Rho", 'Ρ'),
    ("Sigma", 'Σ'),
    ("Tau", 'Τ'),
    ("Upsilon", 'Υ'),
    ("Phi", 'Φ'),
    ("Chi", 'Χ'),
    ("Psi", 'Ψ'),
    ("Omega", 'Ω'),
];

/// Error returned for an unreadable affiliation or chapter designation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAffiliationError {
    #[error("expected `<chapter> <badge>`")]
    MissingBadge,

    #[error("badge `{0}` is not a number")]
    InvalidBadge(String),

    #[error("unrecognized chapter designation `{0}`")]
    InvalidDesignation(String),
}

/// A chapter designation and a badge number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Affiliation {
    designation: String,
    badge: u64,
    primary: bool,
}

impl Affiliation {
    /// Creates an affiliation; `primary` marks the chapter the tree is drawn for.
    pub fn new(designation: impl Into<String>, badge: u64, primary: bool) -> Self {
        Self {
            designation: designation.into(),
            badge,
            primary,
        }
    }

    /// Parses `"<chapter> <badge>"`, marking it primary when the chapter
    /// matches `primary_chapter` (an already normalized designation).
    pub fn parse(text: &str, primary_chapter: &str) -> Result<Self, ParseAffiliationError> {
        let (chapter, badge) = text
            .trim()
            .rsplit_once(char::is_whitespace)
            .ok_or(ParseAffiliationError::MissingBadge)?;
        let badge = badge
            .parse::<u64>()
            .map_err(|_| ParseAffiliationError::InvalidBadge(badge.to_string()))?;
        let designation = parse_designation(chapter)?;
        let primary = designation == primary_chapter;

        Ok(Self {
            designation,
            badge,
            primary,
        })
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn badge(&self) -> u64 {
        self.badge
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.designation, self.badge)
    }
}

impl PartialOrd for Affiliation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Primary chapter first, then by designation and badge.
impl Ord for Affiliation {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .primary
            .cmp(&self.primary)
            .then_with(|| self.designation.cmp(&other.designation))
            .then_with(|| self.badge.cmp(&other.badge))
    }
}

/// Normalizes a chapter name to its Greek designation.
///
/// Accepts either whitespace separated English letter names or a compact
/// designation made of Greek letters, Latin lookalikes and `(A)`/`(B)`.
pub fn parse_designation(chapter: &str) -> Result<String, ParseAffiliationError> {
    let chapter = chapter.trim();
    let invalid = || ParseAffiliationError::InvalidDesignation(chapter.to_string());

    if chapter.is_empty() {
        return Err(invalid());
    }

    let words = chapter.split_whitespace().collect::<Vec<_>>();
    let from_names = words
        .iter()
        .map(|word| letter_from_name(word))
        .collect::<Option<String>>();
    if let Some(designation) = from_names {
        return Ok(designation);
    }

    let mut designation = String::new();
    let mut chars = chapter.chars().filter(|c| !c.is_whitespace());
    while let Some(c) = chars.next() {
        if c == '(' {
            let inner = chars.next().and_then(greek_letter).ok_or_else(invalid)?;
            if !matches!(inner, 'Α' | 'Β') || chars.next() != Some(')') {
                return Err(invalid());
            }
            designation.push('(');
            designation.push(inner);
            designation.push(')');
        } else {
            designation.push(greek_letter(c).ok_or_else(invalid)?);
        }
    }

    Ok(designation)
}

fn letter_from_name(word: &str) -> Option<char> {
    LETTER_NAMES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|(_, letter)| *letter)
}

/// Maps a Greek letter (either case) or a Latin lookalike to a Greek capital.
fn greek_letter(c: char) -> Option<char> {
    let latin = match c {
        'A' => Some('Α'),
        'B' => Some('Β'),
        'E' => Some('Ε'),
        'Z' => Some('Ζ'),
        'H' => Some('Η'),
        'I' => Some('Ι'),
        'K' => Some('Κ'),
        'M' => Some('Μ'),
        'N' => Some('Ν'),
        'O' => Some('Ο'),
        'P' => Some('Ρ'),
        'T' => Some('Τ'),
        'Y' => Some('Υ'),
        'X' => Some('Χ'),
        _ => None,
    };
    if latin.is_some() {
        return latin;
    }

    let upper = c.to_uppercase().next()?;
    ('Α'..='Ω')
        .contains(&upper)
        .then_some(upper)
        .filter(|letter| *letter != '\u{03A2}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_english_names() {
        let affiliation = Affiliation::parse("Delta Alpha 1234", "ΔΑ").unwrap();
        assert_eq!(affiliation.designation(), "ΔΑ");
        assert_eq!(affiliation.badge(), 1234);
        assert!(affiliation.is_primary());
    }

    #[test]
    fn test_parse_latin_lookalikes() {
        let affiliation = Affiliation::parse("HM 56", "ΔΑ").unwrap();
        assert_eq!(affiliation.designation(), "ΗΜ");
        assert!(!affiliation.is_primary());
        assert_eq!(affiliation.to_string(), "ΗΜ 56");
    }

    #[test]
    fn test_parse_greek_and_suffix() {
        assert_eq!(parse_designation("ΔA").unwrap(), "ΔΑ");
        assert_eq!(parse_designation("δα").unwrap(), "ΔΑ");
        assert_eq!(parse_designation("ΗΜ(A)").unwrap(), "ΗΜ(Α)");
        assert_eq!(parse_designation("Eta Mu").unwrap(), "ΗΜ");
    }

    #[test]
    fn test_parse_rejects_unknown_letters() {
        assert_eq!(
            parse_designation("DA"),
            Err(ParseAffiliationError::InvalidDesignation("DA".to_string()))
        );
        assert!(parse_designation("ΗΜ(C)").is_err());
        assert!(parse_designation("").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_badge() {
        assert_eq!(
            Affiliation::parse("ΔΑ", "ΔΑ"),
            Err(ParseAffiliationError::MissingBadge)
        );
        assert_eq!(
            Affiliation::parse("ΔΑ 12x", "ΔΑ"),
            Err(ParseAffiliationError::InvalidBadge("12x".to_string()))
        );
    }

    #[test]
    fn test_primary_sorts_first() {
        let mut affiliations = vec![
            Affiliation::new("ΑΒ", 3, false),
            Affiliation::new("ΩΩ", 9, true),
            Affiliation::new("ΑΒ", 1, false),
        ];
        affiliations.sort();

        let rendered = affiliations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert_eq!(rendered, ["ΩΩ 9", "ΑΒ 1", "ΑΒ 3"]);
    }
}
