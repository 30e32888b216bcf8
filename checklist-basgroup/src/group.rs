use checklist_core::{Authorship, NomCode};
use std::collections::BTreeSet;

/// Names sharing one original epithet and authorship, i.e. the same type.
///
/// Groups are only ever created from authored names. The basionym and
/// based-on slots hold the most trusted candidate seen so far; a newly added
/// candidate with a lower priority number takes over the slot and demotes the
/// previous holder into the matching variations list.
#[derive(Debug, Clone)]
pub struct HomotypicGroup<T> {
    epithet: String,
    authorship: Authorship,
    ex_authorship: Option<Authorship>,
    code: Option<NomCode>,
    basionym: Option<(T, i32)>,
    basionym_variations: Vec<T>,
    recombinations: Vec<T>,
    based_on: Option<(T, i32)>,
    based_on_variations: Vec<T>,
    based_on_ids: BTreeSet<String>,
}

impl<T> HomotypicGroup<T> {
    pub fn new(epithet: impl Into<String>, authorship: Authorship, code: Option<NomCode>) -> Self {
        let ex_authorship = authorship.ex_authorship();
        Self {
            epithet: epithet.into(),
            authorship,
            ex_authorship,
            code,
            basionym: None,
            basionym_variations: Vec::new(),
            recombinations: Vec::new(),
            based_on: None,
            based_on_variations: Vec::new(),
            based_on_ids: BTreeSet::new(),
        }
    }

    pub fn epithet(&self) -> &str {
        &self.epithet
    }

    /// Reference authorship of the original combination
    pub fn authorship(&self) -> &Authorship {
        &self.authorship
    }

    /// Authorship made up of the ex authors, matched loosely against based-on names
    pub fn ex_authorship(&self) -> Option<&Authorship> {
        self.ex_authorship.as_ref()
    }

    pub fn code(&self) -> Option<NomCode> {
        self.code
    }

    pub fn basionym(&self) -> Option<&T> {
        self.basionym.as_ref().map(|(b, _)| b)
    }

    pub fn basionym_priority(&self) -> Option<i32> {
        self.basionym.as_ref().map(|(_, p)| *p)
    }

    pub fn basionym_variations(&self) -> &[T] {
        &self.basionym_variations
    }

    pub fn recombinations(&self) -> &[T] {
        &self.recombinations
    }

    pub fn based_on(&self) -> Option<&T> {
        self.based_on.as_ref().map(|(b, _)| b)
    }

    pub fn based_on_priority(&self) -> Option<i32> {
        self.based_on.as_ref().map(|(_, p)| *p)
    }

    pub fn based_on_variations(&self) -> &[T] {
        &self.based_on_variations
    }

    /// Name ids of the based-on name and its variations
    pub fn based_on_ids(&self) -> &BTreeSet<String> {
        &self.based_on_ids
    }

    pub fn has_basionym(&self) -> bool {
        self.basionym.is_some()
    }

    pub fn has_recombinations(&self) -> bool {
        !self.recombinations.is_empty()
    }

    /// The basionym if known, otherwise the first recombination
    pub fn primary(&self) -> Option<&T> {
        self.basionym().or_else(|| self.recombinations.first())
    }

    pub fn size(&self) -> usize {
        usize::from(self.basionym.is_some())
            + self.basionym_variations.len()
            + self.recombinations.len()
            + usize::from(self.based_on.is_some())
            + self.based_on_variations.len()
    }

    /// All members, basionym first, then its variations, recombinations and based-on names
    pub fn all(&self) -> Vec<&T> {
        self.basionym()
            .into_iter()
            .chain(self.basionym_variations.iter())
            .chain(self.recombinations.iter())
            .chain(self.based_on())
            .chain(self.based_on_variations.iter())
            .collect()
    }

    /// Fill the year and ex authors of the reference authorship if still missing
    pub fn complete_authorship(&mut self, other: &Authorship) {
        if self.authorship.year.is_none() && other.year.is_some() {
            self.authorship.year = other.year.clone();
        }
        if self.ex_authorship.is_none() && other.has_ex_authors() {
            self.authorship.ex_authors = other.ex_authors.clone();
            self.ex_authorship = other.ex_authorship();
        }
    }

    pub fn add_recombination(&mut self, element: T) {
        self.recombinations.push(element);
    }

    pub fn add_basionym_candidate(&mut self, element: T, priority: i32) {
        Self::add_candidate(&mut self.basionym, &mut self.basionym_variations, element, priority);
    }

    pub fn add_based_on_candidate(&mut self, element: T, priority: i32, name_id: Option<&str>) {
        if let Some(id) = name_id {
            self.based_on_ids.insert(id.to_string());
        }
        Self::add_candidate(&mut self.based_on, &mut self.based_on_variations, element, priority);
    }

    fn add_candidate(slot: &mut Option<(T, i32)>, variations: &mut Vec<T>, element: T, priority: i32) {
        match slot.take() {
            None => *slot = Some((element, priority)),
            Some((current, current_priority)) if priority < current_priority => {
                variations.push(current);
                *slot = Some((element, priority));
            }
            Some(current) => {
                *slot = Some(current);
                variations.push(element);
            }
        }
    }

    pub fn into_all(self) -> Vec<T> {
        self.basionym
            .map(|(b, _)| b)
            .into_iter()
            .chain(self.basionym_variations)
            .chain(self.recombinations)
            .chain(self.based_on.map(|(b, _)| b))
            .chain(self.based_on_variations)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group() -> HomotypicGroup<&'static str> {
        HomotypicGroup::new("alba", Authorship::new(["L."]), Some(NomCode::Botanical))
    }

    #[test]
    fn test_lower_priority_number_takes_the_slot() {
        let mut g = group();
        g.add_basionym_candidate("b5", 5);
        g.add_basionym_candidate("b3", 3);
        g.add_basionym_candidate("b4", 4);
        assert_eq!(g.basionym(), Some(&"b3"));
        assert_eq!(g.basionym_priority(), Some(3));
        assert_eq!(g.basionym_variations(), &["b5", "b4"]);
    }

    #[test]
    fn test_equal_priority_keeps_first() {
        let mut g = group();
        g.add_basionym_candidate("first", 2);
        g.add_basionym_candidate("second", 2);
        assert_eq!(g.basionym(), Some(&"first"));
        assert_eq!(g.basionym_variations(), &["second"]);
    }

    #[test]
    fn test_based_on_slot() {
        let mut g = group();
        g.add_based_on_candidate("x", 7, Some("n7"));
        g.add_based_on_candidate("y", 1, Some("n1"));
        assert_eq!(g.based_on(), Some(&"y"));
        assert_eq!(g.based_on_priority(), Some(1));
        assert_eq!(g.based_on_variations(), &["x"]);
        assert!(g.based_on_ids().contains("n7"));
        assert!(g.based_on_ids().contains("n1"));
    }

    #[test]
    fn test_primary_and_members() {
        let mut g = group();
        assert_eq!(g.primary(), None);
        g.add_recombination("r1");
        g.add_recombination("r2");
        assert_eq!(g.primary(), Some(&"r1"));
        g.add_basionym_candidate("b", 1);
        g.add_based_on_candidate("o", 1, None);
        assert_eq!(g.primary(), Some(&"b"));
        assert_eq!(g.size(), 4);
        assert_eq!(g.all(), vec![&"b", &"r1", &"r2", &"o"]);
        assert_eq!(g.into_all(), vec!["b", "r1", "r2", "o"]);
    }

    #[test]
    fn test_complete_authorship() {
        let mut g = group();
        assert!(g.ex_authorship().is_none());
        g.complete_authorship(&Authorship::new(["L."]).with_year("1753"));
        assert_eq!(g.authorship().year.as_deref(), Some("1753"));
        g.complete_authorship(&Authorship::new(["L."]).with_year("1760"));
        assert_eq!(g.authorship().year.as_deref(), Some("1753"));

        let mut g = HomotypicGroup::<&str>::new(
            "guaiaguilensis",
            Authorship::new(["F.Dietr."]).with_ex_authors(["Desf."]),
            None,
        );
        assert_eq!(g.ex_authorship(), Some(&Authorship::new(["Desf."])));
        g.complete_authorship(&Authorship::new(["F.Dietr."]).with_ex_authors(["Poir."]));
        assert_eq!(g.ex_authorship(), Some(&Authorship::new(["Desf."])));
    }
}
