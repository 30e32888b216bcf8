/// Controlled vocabularies for names, usages and their relations
use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomic rank, declared from highest to lowest so the derived ordering
/// sorts higher ranks first. `Unranked` and `Other` are not comparable in a
/// biological sense and are ordered last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Domain,
    Kingdom,
    Phylum,
    Class,
    Order,
    Superfamily,
    Family,
    Subfamily,
    Tribe,
    Subtribe,
    Genus,
    Subgenus,
    Section,
    Series,
    SpeciesAggregate,
    Species,
    Subspecies,
    Variety,
    Subvariety,
    Form,
    Subform,
    Cultivar,
    Unranked,
    Other,
}

impl Rank {
    fn is_uncomparable(&self) -> bool {
        matches!(self, Rank::Unranked | Rank::Other)
    }

    /// Ranks above the species aggregate
    pub fn is_supraspecific(&self) -> bool {
        !self.is_uncomparable() && *self < Rank::SpeciesAggregate
    }

    pub fn is_genus_or_suprageneric(&self) -> bool {
        !self.is_uncomparable() && *self <= Rank::Genus
    }

    pub fn is_species_or_below(&self) -> bool {
        !self.is_uncomparable() && *self >= Rank::Species
    }

    pub fn is_infraspecific(&self) -> bool {
        !self.is_uncomparable() && *self > Rank::Species
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::Unranked
    }
}

/// Taxonomic status of a name usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxonomicStatus {
    Accepted,
    ProvisionallyAccepted,
    Synonym,
    AmbiguousSynonym,
    Misapplied,
    BareName,
}

impl TaxonomicStatus {
    pub const ALL: [TaxonomicStatus; 6] = [
        Self::Accepted,
        Self::ProvisionallyAccepted,
        Self::Synonym,
        Self::AmbiguousSynonym,
        Self::Misapplied,
        Self::BareName,
    ];

    /// Accepted or provisionally accepted
    pub fn is_taxon(&self) -> bool {
        matches!(self, Self::Accepted | Self::ProvisionallyAccepted)
    }

    pub fn is_synonym(&self) -> bool {
        matches!(self, Self::Synonym | Self::AmbiguousSynonym | Self::Misapplied)
    }

    /// Preference when several usages compete for being the primary one,
    /// lower is preferred
    pub fn preference(&self) -> usize {
        match self {
            Self::Accepted => 0,
            Self::ProvisionallyAccepted => 1,
            Self::Synonym => 2,
            Self::AmbiguousSynonym => 3,
            Self::Misapplied => 4,
            Self::BareName => 5,
        }
    }
}

impl fmt::Display for TaxonomicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accepted => "accepted",
            Self::ProvisionallyAccepted => "provisionally accepted",
            Self::Synonym => "synonym",
            Self::AmbiguousSynonym => "ambiguous synonym",
            Self::Misapplied => "misapplied",
            Self::BareName => "bare name",
        };
        write!(f, "{}", s)
    }
}

/// Nomenclatural code governing a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NomCode {
    Bacterial,
    Botanical,
    Cultivars,
    Phytosociological,
    Virus,
    Zoological,
}

/// Kind of name string as determined by the name parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NameType {
    Scientific,
    Virus,
    Hybrid,
    Informal,
    Otu,
    Placeholder,
    NoName,
}

impl Default for NameType {
    fn default() -> Self {
        Self::Scientific
    }
}

/// Nomenclatural relation between two names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NomRelType {
    Basionym,
    Homotypic,
    BasedOn,
    SpellingCorrection,
}

impl fmt::Display for NomRelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Basionym => "basionym",
            Self::Homotypic => "homotypic",
            Self::BasedOn => "based on",
            Self::SpellingCorrection => "spelling correction",
        };
        write!(f, "{}", s)
    }
}

/// Issues flagged on the verbatim source record of a usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Issue {
    /// Several accepted homotypic names were resolved into a single one
    HomotypicConsolidation,
    /// More than one accepted name in a homotypic group could not be resolved
    HomotypicConsolidationUnresolved,
    /// Several names appear to be the original combination
    MultipleBasionyms,
    /// A basionym relation was derived from name and authorship comparison
    BasionymDerived,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        assert!(Rank::Family < Rank::Genus);
        assert!(Rank::Species < Rank::Subspecies);
        assert!(Rank::Family.is_supraspecific());
        assert!(Rank::Genus.is_supraspecific());
        assert!(!Rank::Species.is_supraspecific());
        assert!(!Rank::SpeciesAggregate.is_supraspecific());
        assert!(!Rank::Unranked.is_supraspecific());
        assert!(Rank::Genus.is_genus_or_suprageneric());
        assert!(!Rank::Subgenus.is_genus_or_suprageneric());
        assert!(Rank::Variety.is_infraspecific());
        assert!(!Rank::Other.is_species_or_below());
    }

    #[test]
    fn test_status_flags() {
        assert!(TaxonomicStatus::Accepted.is_taxon());
        assert!(TaxonomicStatus::ProvisionallyAccepted.is_taxon());
        assert!(!TaxonomicStatus::Synonym.is_taxon());
        assert!(TaxonomicStatus::AmbiguousSynonym.is_synonym());
        assert!(!TaxonomicStatus::BareName.is_synonym());
        assert!(!TaxonomicStatus::BareName.is_taxon());
        assert!(
            TaxonomicStatus::Accepted.preference() < TaxonomicStatus::ProvisionallyAccepted.preference()
        );
        assert!(TaxonomicStatus::Synonym.preference() < TaxonomicStatus::AmbiguousSynonym.preference());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&TaxonomicStatus::ProvisionallyAccepted).unwrap(),
            "\"PROVISIONALLY_ACCEPTED\""
        );
        assert_eq!(
            serde_json::to_string(&Issue::HomotypicConsolidationUnresolved).unwrap(),
            "\"HOMOTYPIC_CONSOLIDATION_UNRESOLVED\""
        );
        let rank: Rank = serde_json::from_str("\"SPECIES_AGGREGATE\"").unwrap();
        assert_eq!(rank, Rank::SpeciesAggregate);
    }
}
