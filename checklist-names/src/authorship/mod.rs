/// Comparison of name authorships
///
/// Author strings are normalized to lower case ASCII and compared author by
/// author. As authors are abbreviated in all kinds of ways a shared prefix of
/// the surname or a high Jaro-Winkler similarity counts as a match, unless
/// the initials or a filius suffix contradict it.
pub mod author;

pub use author::{normalize_author, normalize_team, Author};

use checklist_core::{Authorship, NomCode};
use serde::{Deserialize, Serialize};

const MIN_COMMON_PREFIX: usize = 4;
const MIN_SURNAME_SIMILARITY: f64 = 90.0;

/// Tri-state outcome of a fuzzy comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Equality {
    Equal,
    Different,
    Unknown,
}

impl Equality {
    /// Combine two outcomes, `Unknown` being neutral and `Different` dominant
    pub fn and(self, other: Equality) -> Equality {
        match (self, other) {
            (Equality::Different, _) | (_, Equality::Different) => Equality::Different,
            (Equality::Unknown, x) | (x, Equality::Unknown) => x,
            _ => Equality::Equal,
        }
    }
}

/// Compares authorships of two names under a nomenclatural code
pub trait AuthorComparator: Send + Sync {
    /// Lax comparison, `Unknown` when either side lacks authors
    fn compare(&self, a1: &Authorship, a2: &Authorship, code: Option<NomCode>) -> Equality;

    /// Authors must match and known years must agree within the tolerance.
    /// Ex authors are ignored.
    fn compare_strict(
        &self,
        a1: &Authorship,
        a2: &Authorship,
        code: Option<NomCode>,
        year_tolerance: u32,
    ) -> bool;
}

/// Default comparator working on normalized author strings
#[derive(Debug, Clone)]
pub struct StandardAuthorComparator {
    year_tolerance: u32,
}

impl Default for StandardAuthorComparator {
    fn default() -> Self {
        Self { year_tolerance: 2 }
    }
}

impl StandardAuthorComparator {
    pub fn new(year_tolerance: u32) -> Self {
        Self { year_tolerance }
    }

    fn compare_years(y1: Option<&str>, y2: Option<&str>, tolerance: u32) -> Equality {
        let (y1, y2) = match (y1.map(str::trim), y2.map(str::trim)) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
            _ => return Equality::Unknown,
        };
        match (y1.parse::<i64>(), y2.parse::<i64>()) {
            (Ok(a), Ok(b)) if (a - b).unsigned_abs() <= tolerance as u64 => Equality::Equal,
            (Ok(_), Ok(_)) => Equality::Different,
            _ if y1 == y2 => Equality::Equal,
            _ => Equality::Unknown,
        }
    }

    fn compare_teams(a1: &Authorship, a2: &Authorship) -> Equality {
        let team1 = normalize_team(&a1.authors);
        let team2 = normalize_team(&a2.authors);
        if team1.is_empty() || team2.is_empty() {
            return Equality::Unknown;
        }
        if team1 == team2 {
            return Equality::Equal;
        }
        // a single shared author is good enough
        for x in &team1 {
            let x = Author::parse(x);
            for y in &team2 {
                if Self::compare_authors(&x, &Author::parse(y)) == Equality::Equal {
                    return Equality::Equal;
                }
            }
        }
        Equality::Different
    }

    /// Jaro-Winkler on a 0-100 scale, penalizing very short surnames
    fn surname_similarity(s1: &str, s2: &str) -> f64 {
        let mut sim = strsim::jaro_winkler(s1, s2) * 100.0;
        let len = s1.len() + s2.len();
        if len < 10 {
            sim -= (10 - len) as f64 * 5.0;
        }
        sim
    }

    fn compare_authors(a1: &Author, a2: &Author) -> Equality {
        if a1.fullname == a2.fullname {
            return Equality::Equal;
        }
        let common = common_prefix(&a1.surname, &a2.surname);
        if a1.surname == a2.surname
            || Self::surname_similarity(&a1.surname, &a2.surname) > MIN_SURNAME_SIMILARITY
            || common.len() >= MIN_COMMON_PREFIX
        {
            // relatives often share a surname but not initials
            if a1.initials_or_suffix_differ(a2) {
                Equality::Different
            } else {
                Equality::Equal
            }
        } else if !a1.initials_or_suffix_differ(a2)
            && ((a1.surname == common && a2.surname.starts_with(common))
                || (a2.surname == common && a1.surname.starts_with(common)))
        {
            // short surname abbreviation matching the other in full
            Equality::Equal
        } else if (a1.fullname == common && a2.surname.starts_with(common))
            || (a2.fullname == common && a1.surname.starts_with(common))
        {
            Equality::Equal
        } else if common_prefix(&a1.fullname, &a2.fullname)
            .chars()
            .filter(|c| !c.is_whitespace())
            .count()
            > MIN_COMMON_PREFIX
        {
            Equality::Equal
        } else {
            Equality::Different
        }
    }
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((idx, _), _)| idx)
        .unwrap_or_else(|| a.len().min(b.len()));
    &a[..end]
}

impl AuthorComparator for StandardAuthorComparator {
    fn compare(&self, a1: &Authorship, a2: &Authorship, _code: Option<NomCode>) -> Equality {
        let years = Self::compare_years(a1.year.as_deref(), a2.year.as_deref(), self.year_tolerance);
        if years == Equality::Different {
            return years;
        }
        years.and(Self::compare_teams(a1, a2))
    }

    fn compare_strict(
        &self,
        a1: &Authorship,
        a2: &Authorship,
        _code: Option<NomCode>,
        year_tolerance: u32,
    ) -> bool {
        if Self::compare_teams(a1, a2) != Equality::Equal {
            return false;
        }
        // a missing or unparsable year does not contradict
        Self::compare_years(a1.year.as_deref(), a2.year.as_deref(), year_tolerance)
            != Equality::Different
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(authors: &[&str], year: Option<&str>) -> Authorship {
        let a = Authorship::new(authors.iter().copied());
        match year {
            Some(y) => a.with_year(y),
            None => a,
        }
    }

    #[test]
    fn test_equality_and() {
        assert_eq!(Equality::Unknown.and(Equality::Equal), Equality::Equal);
        assert_eq!(Equality::Equal.and(Equality::Unknown), Equality::Equal);
        assert_eq!(Equality::Equal.and(Equality::Different), Equality::Different);
        assert_eq!(Equality::Unknown.and(Equality::Unknown), Equality::Unknown);
        assert_eq!(Equality::Equal.and(Equality::Equal), Equality::Equal);
    }

    #[test]
    fn test_strict_identical() {
        let comp = StandardAuthorComparator::default();
        assert!(comp.compare_strict(&auth(&["L."], None), &auth(&["L."], None), None, 2));
        assert!(comp.compare_strict(
            &auth(&["Torr.", "A.Gray"], Some("1838")),
            &auth(&["Torr.", "A.Gray"], Some("1838")),
            None,
            0
        ));
    }

    #[test]
    fn test_strict_abbreviations() {
        let comp = StandardAuthorComparator::default();
        assert!(comp.compare_strict(&auth(&["Mill."], None), &auth(&["Miller"], None), None, 2));
        assert!(comp.compare_strict(&auth(&["Linnaeus"], None), &auth(&["Linné"], None), None, 2));
        assert!(!comp.compare_strict(&auth(&["L."], None), &auth(&["Mill."], None), None, 2));
        assert!(!comp.compare_strict(&auth(&["Hook."], None), &auth(&["Hook.f."], None), None, 2));
    }

    #[test]
    fn test_strict_year_tolerance() {
        let comp = StandardAuthorComparator::default();
        let a = auth(&["Gould"], Some("1860"));
        assert!(comp.compare_strict(&a, &auth(&["Gould"], Some("1862")), None, 2));
        assert!(!comp.compare_strict(&a, &auth(&["Gould"], Some("1863")), None, 2));
        assert!(!comp.compare_strict(&a, &auth(&["Gould"], Some("1861")), None, 0));
        assert!(comp.compare_strict(&a, &auth(&["Gould"], None), Some(NomCode::Zoological), 2));
        assert!(comp.compare_strict(&a, &auth(&["Gould"], Some("186?")), None, 2));
        assert!(!comp.compare_strict(&a, &auth(&["Gould"], Some("1899")), Some(NomCode::Zoological), 2));
    }

    #[test]
    fn test_strict_ignores_ex_authors() {
        let comp = StandardAuthorComparator::default();
        let ex = auth(&["F.Dietr."], None).with_ex_authors(["Desf."]);
        assert!(comp.compare_strict(&ex, &auth(&["F.Dietr."], None), None, 2));
        assert!(!comp.compare_strict(&ex, &auth(&["Desf."], None), None, 2));
    }

    #[test]
    fn test_empty_authorship_never_strictly_equal() {
        let comp = StandardAuthorComparator::default();
        assert!(!comp.compare_strict(&Authorship::default(), &Authorship::default(), None, 2));
        assert_eq!(
            comp.compare(&Authorship::default(), &auth(&["L."], None), None),
            Equality::Unknown
        );
    }

    #[test]
    fn test_lax_compare() {
        let comp = StandardAuthorComparator::new(1);
        assert_eq!(
            comp.compare(&auth(&["Desf."], None), &auth(&["Desfontaines"], Some("1798")), None),
            Equality::Equal
        );
        assert_eq!(
            comp.compare(&auth(&["Desf."], Some("1798")), &auth(&["Desf."], Some("1820")), None),
            Equality::Different
        );
        assert_eq!(
            comp.compare(&auth(&["Brouillet"], None), &auth(&["Urbatsch"], None), None),
            Equality::Different
        );
    }
}
