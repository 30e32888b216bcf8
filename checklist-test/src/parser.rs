//! Minimal authorship parser for fixtures
//!
//! Understands strings like `L.`, `(L.) Mill.`, `Torr. & A.Gray, 1838` and
//! `Desf. ex F.Dietr., 1823`. Real name parsing is not this crate's business.

use checklist_core::Authorship;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BASIONYM: Regex = Regex::new(r"^\((.*?)\)\s*(.*)$").unwrap();
    static ref YEAR: Regex = Regex::new(r"(?:,\s*|\s+)(\d{3}[\d?])\s*$").unwrap();
    static ref TEAM_SEPARATOR: Regex = Regex::new(r"\s*(?:&|,|\bet\b)\s*").unwrap();
}

/// Split a full authorship into combination and basionym authorship
pub fn parse_authorship(authorship: &str) -> (Authorship, Authorship) {
    let authorship = authorship.trim();
    match BASIONYM.captures(authorship) {
        Some(caps) => (parse_combination(&caps[2]), parse_combination(&caps[1])),
        None => (parse_combination(authorship), Authorship::default()),
    }
}

/// Parse the authorship of a single combination, without brackets
pub fn parse_combination(authorship: &str) -> Authorship {
    let mut rest = authorship.trim().to_string();
    let mut year = None;
    if let Some(caps) = YEAR.captures(&rest) {
        year = Some(caps[1].to_string());
        let start = caps.get(0).map(|m| m.start()).unwrap_or(rest.len());
        rest.truncate(start);
    }
    let (ex, authors) = match rest.split_once(" ex ") {
        Some((ex, authors)) => (team(ex), team(authors)),
        None => (Vec::new(), team(&rest)),
    };
    let mut parsed = Authorship::new(authors).with_ex_authors(ex);
    if let Some(y) = year {
        parsed = parsed.with_year(y);
    }
    parsed
}

fn team(authors: &str) -> Vec<String> {
    TEAM_SEPARATOR
        .split(authors.trim())
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
