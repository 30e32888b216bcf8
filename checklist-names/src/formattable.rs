use checklist_core::{Authorship, LinneanNameUsage, Rank};

/// The name properties homotypic grouping depends on
pub trait FormattableName {
    /// Usage id, unique within a dataset
    fn id(&self) -> &str;

    fn scientific_name(&self) -> &str;

    fn combination_authorship(&self) -> &Authorship;

    fn basionym_authorship(&self) -> &Authorship;

    fn terminal_epithet(&self) -> Option<&str>;

    fn rank(&self) -> Rank;

    fn is_autonym(&self) -> bool;

    fn is_trinomial(&self) -> bool;

    /// Name with authorship as shown to users
    fn label(&self) -> String;

    fn name_id(&self) -> Option<&str>;

    fn has_basionym_authorship(&self) -> bool {
        !self.basionym_authorship().is_empty()
    }

    fn has_authorship(&self) -> bool {
        !self.combination_authorship().is_empty() || self.has_basionym_authorship()
    }

    /// The authorship of the original combination, i.e. the bracket authors
    /// of a recombination or the authors of the name itself
    fn basionym_or_combination_authorship(&self) -> &Authorship {
        if self.has_basionym_authorship() {
            self.basionym_authorship()
        } else {
            self.combination_authorship()
        }
    }
}

impl FormattableName for LinneanNameUsage {
    fn id(&self) -> &str {
        &self.id
    }

    fn scientific_name(&self) -> &str {
        &self.scientific_name
    }

    fn combination_authorship(&self) -> &Authorship {
        &self.combination_authorship
    }

    fn basionym_authorship(&self) -> &Authorship {
        &self.basionym_authorship
    }

    fn terminal_epithet(&self) -> Option<&str> {
        LinneanNameUsage::terminal_epithet(self)
    }

    fn rank(&self) -> Rank {
        self.rank
    }

    fn is_autonym(&self) -> bool {
        LinneanNameUsage::is_autonym(self)
    }

    fn is_trinomial(&self) -> bool {
        LinneanNameUsage::is_trinomial(self)
    }

    fn label(&self) -> String {
        LinneanNameUsage::label(self)
    }

    fn name_id(&self) -> Option<&str> {
        self.name_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basionym_or_combination_authorship() {
        let mut u = LinneanNameUsage {
            id: "u1".to_string(),
            name_id: Some("n1".to_string()),
            scientific_name: "Picea alba".to_string(),
            genus: Some("Picea".to_string()),
            specific_epithet: Some("alba".to_string()),
            combination_authorship: Authorship::new(["Mill."]),
            ..Default::default()
        };
        let name: &dyn FormattableName = &u;
        assert_eq!(name.basionym_or_combination_authorship(), &Authorship::new(["Mill."]));
        assert!(name.has_authorship());
        assert_eq!(name.name_id(), Some("n1"));
        assert_eq!(name.id(), "u1");

        u.basionym_authorship = Authorship::new(["L."]);
        let name: &dyn FormattableName = &u;
        assert!(name.has_basionym_authorship());
        assert_eq!(name.basionym_or_combination_authorship(), &Authorship::new(["L."]));
        assert_eq!(name.terminal_epithet(), Some("alba"));
    }
}
