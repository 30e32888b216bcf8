//! Normalization of single author strings

use crate::fold::fold_to_ascii;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FILIUS: Regex = Regex::new(r"([A-Z][a-z]*)[. ]\s*f(?:il)?\.?(?:\s|$)").unwrap();
    static ref TRANSLITERATIONS: Regex = Regex::new(r"(?i)([auo])e").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s,]+").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref AUTHOR: Regex =
        Regex::new(r"^((?:[a-z]\s)*).*?([a-z]+)( (?:filius|fil|fl|f|bis|ter)\.?)?$").unwrap();
}

/// Lower-cased ASCII form of an author with punctuation turned into spaces.
/// Returns `None` for blank input.
pub fn normalize_author(x: &str) -> Option<String> {
    if x.trim().is_empty() {
        return None;
    }
    let x = FILIUS.replace_all(x, "$1 filius ");
    let x = fold_to_ascii(&x);
    let x = TRANSLITERATIONS.replace_all(&x, "$1");
    let x = PUNCTUATION.replace_all(&x, " ");
    let x = WHITESPACE.replace_all(x.trim(), " ");
    if x.is_empty() {
        None
    } else {
        Some(x.to_lowercase())
    }
}

/// Normalize a whole team, splitting combined entries and dropping `et al.`
pub fn normalize_team(authors: &[String]) -> Vec<String> {
    authors
        .iter()
        .flat_map(|a| a.split(|c| c == '&' || c == ',').flat_map(|p| p.split(" et ")))
        .filter_map(normalize_author)
        .filter(|a| a != "al")
        .collect()
}

/// A normalized author split into initials, surname and an optional filius style suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub fullname: String,
    pub initials: String,
    pub surname: String,
    pub suffix: Option<String>,
}

impl Author {
    pub fn parse(normalized: &str) -> Self {
        match AUTHOR.captures(normalized) {
            Some(caps) => {
                let initials = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let surname = caps.get(2).map(|m| m.as_str().trim()).unwrap_or(normalized);
                let suffix = caps
                    .get(3)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        if s.starts_with('f') {
                            "filius".to_string()
                        } else {
                            s.to_string()
                        }
                    });
                Self {
                    fullname: normalized.to_string(),
                    initials: initials.to_string(),
                    surname: surname.to_string(),
                    suffix,
                }
            }
            None => {
                tracing::debug!("Cannot parse single author: {}", normalized);
                Self {
                    fullname: normalized.to_string(),
                    initials: String::new(),
                    surname: normalized.trim().to_string(),
                    suffix: None,
                }
            }
        }
    }

    pub fn has_initials(&self) -> bool {
        !self.initials.is_empty()
    }

    pub fn initials_or_suffix_differ(&self, other: &Author) -> bool {
        self.initials_differ(other) || self.suffix != other.suffix
    }

    /// Initials differ unless one set of initials is contained in the other
    fn initials_differ(&self, other: &Author) -> bool {
        if !self.has_initials() || !other.has_initials() || self.initials == other.initials {
            return false;
        }
        let mut smaller: Vec<char> = self.initials.chars().filter(|c| !c.is_whitespace()).collect();
        let mut larger: Vec<char> = other.initials.chars().filter(|c| !c.is_whitespace()).collect();
        if smaller.len() > larger.len() {
            std::mem::swap(&mut smaller, &mut larger);
        }
        for c in smaller {
            match larger.iter().position(|l| *l == c) {
                Some(idx) => {
                    larger.remove(idx);
                }
                None => return true,
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_author() {
        assert_eq!(normalize_author("L."), Some("l".to_string()));
        assert_eq!(normalize_author("Müll.Arg."), Some("mull arg".to_string()));
        assert_eq!(normalize_author("  "), None);
        assert_eq!(normalize_author("."), None);
        assert_eq!(normalize_author("Hook.f."), Some("hook filius".to_string()));
        assert_eq!(normalize_author("Goeppert"), Some("goppert".to_string()));
    }

    #[test]
    fn test_normalize_team() {
        let team = vec!["Torr. & A.Gray".to_string(), "al.".to_string()];
        assert_eq!(normalize_team(&team), vec!["torr", "a gray"]);
        let team = vec!["Brouillet et Urbatsch".to_string()];
        assert_eq!(normalize_team(&team), vec!["brouillet", "urbatsch"]);
    }

    #[test]
    fn test_parse_author() {
        let a = Author::parse("a gray");
        assert_eq!(a.initials, "a");
        assert_eq!(a.surname, "gray");
        assert_eq!(a.suffix, None);

        let a = Author::parse("hook filius");
        assert_eq!(a.surname, "hook");
        assert_eq!(a.suffix.as_deref(), Some("filius"));

        let a = Author::parse("r p roberts");
        assert_eq!(a.initials, "r p");
        assert_eq!(a.surname, "roberts");
    }

    #[test]
    fn test_initials_differ() {
        let a = Author::parse("a gray");
        assert!(!a.initials_or_suffix_differ(&Author::parse("a b gray")));
        assert!(a.initials_or_suffix_differ(&Author::parse("j gray")));
        assert!(!a.initials_or_suffix_differ(&Author::parse("gray")));
        assert!(Author::parse("hook").initials_or_suffix_differ(&Author::parse("hook filius")));
    }
}
