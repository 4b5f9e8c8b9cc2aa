//! Generational ranks.
//!
//! A [`Rank`] orders entities in time. Trees of chapters use plain integers
//! (founding years), trees of members use [`Semester`]s. Both kinds order
//! by their numeric value and support checked whole-step arithmetic, so the
//! rank one step before `Fall 2000` is `Spring 2000`. A tree uses one kind
//! throughout; ranks of different kinds are never equal.
//!
//! # Example
//!
//! ```
//! # use snutree_core::rank::{Rank, Semester};
//! let fall: Semester = "Fall 2000".parse().unwrap();
//! let rank = Rank::Semester(fall);
//!
//! assert_eq!(rank.checked_sub(1).unwrap().to_string(), "Spring 2000");
//! assert!(Rank::Integer(1999) < Rank::Integer(2000));
//! assert!(Rank::Integer(i64::MIN).checked_sub(1).is_none());
//! ```

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Error returned when text is not a valid rank or semester.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rank `{0}`: expected an integer or a semester such as `Fall 2000`")]
pub struct ParseRankError(String);

/// Half of an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Spring = 0,
    Fall = 1,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "Spring"),
            Season::Fall => write!(f, "Fall"),
        }
    }
}

/// An academic semester, stored as `2 * year + season`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semester(i64);

impl Semester {
    /// The semester of `season` in `year`, or `None` when the year is too
    /// large to store.
    pub fn new(season: Season, year: i64) -> Option<Self> {
        year.checked_mul(2)?
            .checked_add(season as i64)
            .map(Self)
    }

    /// The semester `steps` semesters later, or `None` on overflow.
    pub fn checked_add(self, steps: i64) -> Option<Self> {
        self.0.checked_add(steps).map(Self)
    }

    pub fn checked_sub(self, steps: i64) -> Option<Self> {
        self.0.checked_sub(steps).map(Self)
    }

    pub fn year(self) -> i64 {
        self.0.div_euclid(2)
    }

    pub fn season(self) -> Season {
        if self.0.rem_euclid(2) == 0 {
            Season::Spring
        } else {
            Season::Fall
        }
    }

    /// Returns the raw ordinal of this semester.
    pub fn ordinal(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season(), self.year())
    }
}

impl FromStr for Semester {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRankError(s.to_string());

        let (season, year) = s.trim().split_once(' ').ok_or_else(err)?;
        let season = match season {
            "Spring" => Season::Spring,
            "Fall" => Season::Fall,
            _ => return Err(err()),
        };
        if year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year = year.parse::<i64>().map_err(|_| err())?;

        Semester::new(season, year).ok_or_else(err)
    }
}


/// An orderable generational index.
///
/// Ranks order by numeric value, then integers before semesters. Equality
/// and hashing include the kind, so `Rank::Integer(4001)` and the semester
/// with ordinal 4001 are different ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RankRepr")]
pub enum Rank {
    Integer(i64),
    Semester(Semester),
}

impl Rank {
    /// Numeric value used for comparisons.
    pub fn value(self) -> i64 {
        match self {
            Rank::Integer(n) => n,
            Rank::Semester(semester) => semester.ordinal(),
        }
    }

    /// True when both ranks are integers or both are semesters.
    pub fn same_kind(self, other: Rank) -> bool {
        matches!(
            (self, other),
            (Rank::Integer(_), Rank::Integer(_)) | (Rank::Semester(_), Rank::Semester(_))
        )
    }

    /// The rank `steps` ranks later, of the same kind, or `None` on overflow.
    pub fn checked_add(self, steps: i64) -> Option<Rank> {
        match self {
            Rank::Integer(n) => n.checked_add(steps).map(Rank::Integer),
            Rank::Semester(semester) => semester.checked_add(steps).map(Rank::Semester),
        }
    }

    /// The rank `steps` ranks earlier, of the same kind, or `None` on overflow.
    pub fn checked_sub(self, steps: i64) -> Option<Rank> {
        match self {
            Rank::Integer(n) => n.checked_sub(steps).map(Rank::Integer),
            Rank::Semester(semester) => semester.checked_sub(steps).map(Rank::Semester),
        }
    }
}

impl PartialOrd for Rank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rank {
    fn cmp(&self, other: &Self) -> Ordering {
        let is_semester = |rank: &Rank| matches!(rank, Rank::Semester(_));
        self.value()
            .cmp(&other.value())
            .then_with(|| is_semester(self).cmp(&is_semester(other)))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Integer(n) => write!(f, "{n}"),
            Rank::Semester(semester) => write!(f, "{semester}"),
        }
    }
}

impl FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Ok(Rank::Integer(n));
        }
        s.parse::<Semester>().map(Rank::Semester)
    }
}

impl From<Semester> for Rank {
    fn from(semester: Semester) -> Self {
        Rank::Semester(semester)
    }
}

impl From<i64> for Rank {
    fn from(n: i64) -> Self {
        Rank::Integer(n)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RankRepr {
    Integer(i64),
    Text(String),
}

impl TryFrom<RankRepr> for Rank {
    type Error = ParseRankError;

    fn try_from(repr: RankRepr) -> Result<Self, Self::Error> {
        match repr {
            RankRepr::Integer(n) => Ok(Rank::Integer(n)),
            RankRepr::Text(text) => text.parse(),
        }
    }
}
