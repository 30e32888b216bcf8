/// Parsed authorship of a name
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authors, ex-authors and year of a single combination.
///
/// For `Desf. ex F.Dietr., 1823` the ex author is `Desf.` and the author
/// validating the name is `F.Dietr.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub ex_authors: Vec<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl Authorship {
    pub fn new<S: Into<String>>(authors: impl IntoIterator<Item = S>) -> Self {
        Self {
            authors: authors.into_iter().map(Into::into).collect(),
            ex_authors: Vec::new(),
            year: None,
        }
    }

    pub fn with_ex_authors<S: Into<String>>(mut self, ex_authors: impl IntoIterator<Item = S>) -> Self {
        self.ex_authors = ex_authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// No authors, no ex authors and no year
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.ex_authors.is_empty() && self.year.is_none()
    }

    pub fn has_authors(&self) -> bool {
        !self.authors.is_empty()
    }

    pub fn has_ex_authors(&self) -> bool {
        !self.ex_authors.is_empty()
    }

    /// Year as a number, ignoring placeholder digits like `186?`
    pub fn year_int(&self) -> Option<i32> {
        let year = self.year.as_deref()?.trim();
        if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
            year.parse().ok()
        } else {
            None
        }
    }

    /// Copy without the year
    pub fn without_year(&self) -> Self {
        Self {
            authors: self.authors.clone(),
            ex_authors: self.ex_authors.clone(),
            year: None,
        }
    }

    /// The authorship made up of the ex authors only, i.e. the authors a
    /// later validly published name can be based on
    pub fn ex_authorship(&self) -> Option<Self> {
        if self.ex_authors.is_empty() {
            None
        } else {
            Some(Self::new(self.ex_authors.iter().cloned()))
        }
    }
}

fn join_team(f: &mut fmt::Formatter<'_>, team: &[String]) -> fmt::Result {
    for (idx, author) in team.iter().enumerate() {
        if idx > 0 {
            if idx + 1 == team.len() {
                write!(f, " & ")?;
            } else {
                write!(f, ", ")?;
            }
        }
        write!(f, "{}", author)?;
    }
    Ok(())
}

impl fmt::Display for Authorship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.ex_authors.is_empty() {
            join_team(f, &self.ex_authors)?;
            write!(f, " ex ")?;
        }
        join_team(f, &self.authors)?;
        if let Some(year) = &self.year {
            if self.authors.is_empty() && self.ex_authors.is_empty() {
                write!(f, "{}", year)?;
            } else {
                write!(f, ", {}", year)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Authorship::new(["L."]).to_string(), "L.");
        assert_eq!(Authorship::new(["Torr.", "A.Gray"]).to_string(), "Torr. & A.Gray");
        assert_eq!(
            Authorship::new(["Brouillet", "Urbatsch", "R.P.Roberts"]).to_string(),
            "Brouillet, Urbatsch & R.P.Roberts"
        );
        assert_eq!(
            Authorship::new(["F.Dietr."]).with_ex_authors(["Desf."]).to_string(),
            "Desf. ex F.Dietr."
        );
        assert_eq!(Authorship::new(["Gould"]).with_year("1860").to_string(), "Gould, 1860");
        assert_eq!(Authorship::default().with_year("1860").to_string(), "1860");
        assert_eq!(Authorship::default().to_string(), "");
    }

    #[test]
    fn test_empty() {
        assert!(Authorship::default().is_empty());
        assert!(!Authorship::default().with_year("1999").is_empty());
        assert!(!Authorship::new(["L."]).is_empty());
    }

    #[test]
    fn test_year_int() {
        assert_eq!(Authorship::new(["Gould"]).with_year("1860").year_int(), Some(1860));
        assert_eq!(Authorship::new(["Gould"]).with_year("186?").year_int(), None);
        assert_eq!(Authorship::new(["Gould"]).year_int(), None);
    }

    #[test]
    fn test_ex_authorship() {
        let a = Authorship::new(["F.Dietr."]).with_ex_authors(["Desf."]).with_year("1823");
        assert_eq!(a.ex_authorship(), Some(Authorship::new(["Desf."])));
        assert_eq!(a.without_year().year, None);
        assert!(Authorship::new(["L."]).ex_authorship().is_none());
    }
}
