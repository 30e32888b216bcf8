use super::authorship::Authorship;
use super::vocab::{NameType, NomCode, Rank, TaxonomicStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flattened name usage carrying only the name parts needed for homotypic
/// grouping plus the usage id and parent id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinneanNameUsage {
    /// Usage id, not the name id
    pub id: String,
    pub name_id: Option<String>,
    pub parent_id: Option<String>,
    pub sector_key: Option<i32>,
    pub status: Option<TaxonomicStatus>,
    #[serde(default)]
    pub name_type: NameType,
    pub code: Option<NomCode>,
    pub scientific_name: String,
    /// Display authorship as shown in the label
    pub authorship: Option<String>,
    #[serde(default)]
    pub rank: Rank,
    pub uninomial: Option<String>,
    pub genus: Option<String>,
    pub infrageneric_epithet: Option<String>,
    pub specific_epithet: Option<String>,
    pub infraspecific_epithet: Option<String>,
    pub cultivar_epithet: Option<String>,
    #[serde(default)]
    pub combination_authorship: Authorship,
    #[serde(default)]
    pub basionym_authorship: Authorship,
}

impl LinneanNameUsage {
    /// Lowest epithet of a bi- or trinomial
    pub fn terminal_epithet(&self) -> Option<&str> {
        self.infraspecific_epithet
            .as_deref()
            .or(self.specific_epithet.as_deref())
    }

    /// Infraspecific name repeating the species epithet, e.g. `Abies alba subsp. alba`
    pub fn is_autonym(&self) -> bool {
        match (&self.specific_epithet, &self.infraspecific_epithet) {
            (Some(sp), Some(infra)) => sp == infra,
            _ => match (&self.genus, &self.infrageneric_epithet) {
                (Some(g), Some(infra)) => self.specific_epithet.is_none() && g == infra,
                _ => false,
            },
        }
    }

    pub fn is_binomial(&self) -> bool {
        self.genus.is_some() && self.specific_epithet.is_some()
    }

    pub fn is_trinomial(&self) -> bool {
        self.is_binomial() && self.infraspecific_epithet.is_some()
    }

    pub fn has_basionym_authorship(&self) -> bool {
        !self.basionym_authorship.is_empty()
    }

    pub fn has_authorship(&self) -> bool {
        !self.combination_authorship.is_empty() || !self.basionym_authorship.is_empty()
    }

    /// Accepted or provisionally accepted
    pub fn is_taxon(&self) -> bool {
        self.status.map(|s| s.is_taxon()).unwrap_or(false)
    }

    pub fn is_synonym(&self) -> bool {
        self.status.map(|s| s.is_synonym()).unwrap_or(false)
    }

    /// Scientific name followed by its display authorship
    pub fn label(&self) -> String {
        match self.authorship.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} {}", self.scientific_name, a),
            _ => self.scientific_name.clone(),
        }
    }

    pub fn to_simple(&self) -> SimpleName {
        SimpleName {
            id: self.id.clone(),
            parent: self.parent_id.clone(),
            name: self.scientific_name.clone(),
            authorship: self.authorship.clone(),
            rank: self.rank,
            status: self.status,
            code: self.code,
        }
    }
}

impl fmt::Display for LinneanNameUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label(), self.id)
    }
}

/// Minimal usage view used for root taxa, synonym listings and logging
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimpleName {
    pub id: String,
    pub parent: Option<String>,
    pub name: String,
    pub authorship: Option<String>,
    pub rank: Rank,
    pub status: Option<TaxonomicStatus>,
    pub code: Option<NomCode>,
}

impl SimpleName {
    pub fn label(&self) -> String {
        match self.authorship.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} {}", self.name, a),
            _ => self.name.clone(),
        }
    }

    pub fn is_taxon(&self) -> bool {
        self.status.map(|s| s.is_taxon()).unwrap_or(false)
    }
}

impl fmt::Display for SimpleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn species(genus: &str, epithet: &str) -> LinneanNameUsage {
        LinneanNameUsage {
            id: "1".to_string(),
            scientific_name: format!("{} {}", genus, epithet),
            rank: Rank::Species,
            genus: Some(genus.to_string()),
            specific_epithet: Some(epithet.to_string()),
            status: Some(TaxonomicStatus::Accepted),
            ..Default::default()
        }
    }

    #[test]
    fn test_terminal_epithet() {
        let mut u = species("Abies", "alba");
        assert_eq!(u.terminal_epithet(), Some("alba"));
        u.infraspecific_epithet = Some("nana".to_string());
        assert_eq!(u.terminal_epithet(), Some("nana"));
        assert!(u.is_trinomial());
        assert!(!u.is_autonym());
    }

    #[test]
    fn test_autonym() {
        let mut u = species("Abies", "alba");
        assert!(!u.is_autonym());
        u.infraspecific_epithet = Some("alba".to_string());
        u.rank = Rank::Subspecies;
        assert!(u.is_autonym());
    }

    #[test]
    fn test_label() {
        let mut u = species("Abies", "alba");
        assert_eq!(u.label(), "Abies alba");
        u.authorship = Some("Mill.".to_string());
        assert_eq!(u.label(), "Abies alba Mill.");
        assert_eq!(u.to_simple().label(), "Abies alba Mill.");
        assert_eq!(u.to_string(), "Abies alba Mill. [1]");
    }

    #[test]
    fn test_status_helpers() {
        let mut u = species("Abies", "alba");
        assert!(u.is_taxon());
        u.status = Some(TaxonomicStatus::Synonym);
        assert!(u.is_synonym());
        assert!(!u.is_taxon());
        u.status = None;
        assert!(!u.is_taxon());
        assert!(!u.is_synonym());
    }

    #[test]
    fn test_authorship_flags() {
        let mut u = species("Picea", "alba");
        assert!(!u.has_authorship());
        u.basionym_authorship = Authorship::new(["L."]);
        assert!(u.has_basionym_authorship());
        assert!(u.has_authorship());
    }
}
