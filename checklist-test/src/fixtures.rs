//! Test fixtures and usage builders
//!
//! Common test data for homotypic consolidation across the workspace.

use crate::parser::parse_authorship;
use checklist_core::{LinneanNameUsage, NameType, NomCode, Rank, TaxonomicStatus};
use std::collections::HashMap;

const RANK_MARKERS: &[&str] = &["subsp.", "ssp.", "var.", "f.", "subvar.", "cv."];

/// Builder for flattened usages
#[derive(Debug, Clone)]
pub struct UsageBuilder {
    usage: LinneanNameUsage,
}

impl UsageBuilder {
    /// Usage with the given id, name and authorship. Name parts are derived
    /// from the name: one word is a uninomial, two a binomial, three (with an
    /// optional rank marker) a trinomial. The rank is guessed the same way and
    /// the name id defaults to `n` followed by the usage id.
    pub fn new(id: impl Into<String>, name: &str, authorship: &str) -> Self {
        let id = id.into();
        let words: Vec<&str> = name
            .split_whitespace()
            .filter(|w| !RANK_MARKERS.contains(w))
            .collect();
        let (comb, bas) = parse_authorship(authorship);
        let mut usage = LinneanNameUsage {
            name_id: Some(format!("n{}", id)),
            id,
            status: Some(TaxonomicStatus::Accepted),
            scientific_name: name.to_string(),
            authorship: Some(authorship.trim().to_string()).filter(|a| !a.is_empty()),
            combination_authorship: comb,
            basionym_authorship: bas,
            ..Default::default()
        };
        match words.as_slice() {
            [uninomial] => {
                usage.uninomial = Some(uninomial.to_string());
                usage.rank = Rank::Genus;
            }
            [genus, species] => {
                usage.genus = Some(genus.to_string());
                usage.specific_epithet = Some(species.to_string());
                usage.rank = Rank::Species;
            }
            [genus, species, infra, ..] => {
                usage.genus = Some(genus.to_string());
                usage.specific_epithet = Some(species.to_string());
                usage.infraspecific_epithet = Some(infra.to_string());
                usage.rank = if name.contains(" var. ") {
                    Rank::Variety
                } else {
                    Rank::Subspecies
                };
            }
            [] => {}
        }
        Self { usage }
    }

    /// Accepted higher taxon like a family
    pub fn taxon(id: impl Into<String>, name: &str, rank: Rank) -> Self {
        let mut b = Self::new(id, name, "");
        b.usage.rank = rank;
        b
    }

    pub fn rank(mut self, rank: Rank) -> Self {
        self.usage.rank = rank;
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.usage.parent_id = Some(parent_id.into());
        self
    }

    pub fn status(mut self, status: TaxonomicStatus) -> Self {
        self.usage.status = Some(status);
        self
    }

    pub fn provisional(self) -> Self {
        self.status(TaxonomicStatus::ProvisionallyAccepted)
    }

    /// Synonym of the given accepted usage
    pub fn synonym_of(self, accepted_id: impl Into<String>) -> Self {
        self.status(TaxonomicStatus::Synonym).parent(accepted_id)
    }

    pub fn sector(mut self, sector_key: i32) -> Self {
        self.usage.sector_key = Some(sector_key);
        self
    }

    pub fn name_id(mut self, name_id: Option<&str>) -> Self {
        self.usage.name_id = name_id.map(str::to_string);
        self
    }

    pub fn code(mut self, code: NomCode) -> Self {
        self.usage.code = Some(code);
        self
    }

    pub fn name_type(mut self, name_type: NameType) -> Self {
        self.usage.name_type = name_type;
        self
    }

    pub fn build(self) -> LinneanNameUsage {
        self.usage
    }
}

/// Shortcut for an accepted usage built from name and authorship
pub fn usage(id: &str, name: &str, authorship: &str) -> UsageBuilder {
    UsageBuilder::new(id, name, authorship)
}

/// Priority function looking up usage ids, everything else gets the fallback
pub fn priority_by_id(
    priorities: &[(&str, i32)],
    fallback: i32,
) -> impl Fn(&LinneanNameUsage) -> i32 + Send + Sync + Clone {
    let map: HashMap<String, i32> = priorities
        .iter()
        .map(|(id, p)| (id.to_string(), *p))
        .collect();
    move |u: &LinneanNameUsage| map.get(&u.id).copied().unwrap_or(fallback)
}

/// A family with one genus holding the given usages.
///
/// Usages without a parent are attached to the genus `gen`, the family has
/// id `fam`.
pub fn family_tree(family: &str, genus: &str, usages: Vec<LinneanNameUsage>) -> Vec<LinneanNameUsage> {
    let mut tree = vec![
        UsageBuilder::taxon("fam", family, Rank::Family).build(),
        UsageBuilder::taxon("gen", genus, Rank::Genus).parent("fam").build(),
    ];
    for mut u in usages {
        if u.parent_id.is_none() {
            u.parent_id = Some("gen".to_string());
        }
        tree.push(u);
    }
    tree
}
