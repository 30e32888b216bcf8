//! Sorting of same-epithet names into homotypic groups
//!
//! Only authorships are compared, epithets are expected to be equal already.
//! Names without any authorship are handed to a sink and never grouped.
use crate::group::HomotypicGroup;
use checklist_core::{Authorship, NomCode};
use checklist_names::{AuthorComparator, Equality, FormattableName};
use tracing::{debug, warn};

/// Processing order of candidates, ex authors first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CandidateClass {
    ExAuthors,
    Recombination,
    Original,
}

struct Candidate<T> {
    class: CandidateClass,
    priority: i32,
    label: String,
    name_id: Option<String>,
    id: String,
    element: T,
}

pub struct BasionymSorter<'a, T> {
    comparator: &'a dyn AuthorComparator,
    priority: Box<dyn Fn(&T) -> i32 + 'a>,
    year_tolerance: u32,
}

impl<'a, T> BasionymSorter<'a, T> {
    pub fn new(comparator: &'a dyn AuthorComparator, priority: impl Fn(&T) -> i32 + 'a) -> Self {
        Self {
            comparator,
            priority: Box::new(priority),
            year_tolerance: 2,
        }
    }

    pub fn with_year_tolerance(mut self, year_tolerance: u32) -> Self {
        self.year_tolerance = year_tolerance;
        self
    }

    /// Group elements sharing the given normalized epithet.
    ///
    /// The input order does not matter: candidates are processed names with
    /// ex authors first, then recombinations, then original names, each class
    /// ordered by priority, label, name id and usage id.
    pub fn group_basionyms<R, S>(
        &self,
        code: Option<NomCode>,
        epithet: &str,
        elements: Vec<T>,
        resolver: R,
        mut unauthored: S,
    ) -> Vec<HomotypicGroup<T>>
    where
        R: Fn(&T) -> &dyn FormattableName,
        S: FnMut(&T),
    {
        let mut candidates = Vec::with_capacity(elements.len());
        for element in elements {
            let name = resolver(&element);
            if !name.has_authorship() {
                warn!("Ignore unauthored name {} in homotypic grouping of {}", name.label(), epithet);
                unauthored(&element);
                continue;
            }
            let class = if name.combination_authorship().has_ex_authors()
                || name.basionym_authorship().has_ex_authors()
            {
                CandidateClass::ExAuthors
            } else if name.has_basionym_authorship() {
                CandidateClass::Recombination
            } else {
                CandidateClass::Original
            };
            let label = name.label();
            let name_id = name.name_id().map(str::to_string);
            let id = name.id().to_string();
            candidates.push(Candidate {
                class,
                priority: (self.priority)(&element),
                label,
                name_id,
                id,
                element,
            });
        }
        candidates.sort_by(|a, b| {
            a.class
                .cmp(&b.class)
                .then(a.priority.cmp(&b.priority))
                .then_with(|| a.label.cmp(&b.label))
                .then_with(|| a.name_id.cmp(&b.name_id))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut groups: Vec<HomotypicGroup<T>> = Vec::new();
        for candidate in candidates {
            let name = resolver(&candidate.element);
            let authorship = name.basionym_or_combination_authorship().clone();
            let recombination = name.has_basionym_authorship();

            if let Some(group) = self.find_strict_match(code, &authorship, &mut groups) {
                group.complete_authorship(&authorship);
                if recombination {
                    group.add_recombination(candidate.element);
                } else {
                    group.add_basionym_candidate(candidate.element, candidate.priority);
                }
            } else if let Some(group) = self.find_ex_author_match(code, &authorship, &mut groups) {
                debug!("{} is based on the ex authors of {} {}", candidate.label, epithet, group.authorship());
                group.add_based_on_candidate(
                    candidate.element,
                    candidate.priority,
                    candidate.name_id.as_deref(),
                );
            } else {
                let mut group = HomotypicGroup::new(epithet, authorship, code);
                if recombination {
                    group.add_recombination(candidate.element);
                } else {
                    group.add_basionym_candidate(candidate.element, candidate.priority);
                }
                groups.push(group);
            }
        }
        debug!("{} homotypic groups found for epithet {}", groups.len(), epithet);
        groups
    }

    fn find_strict_match<'g>(
        &self,
        code: Option<NomCode>,
        authorship: &Authorship,
        groups: &'g mut [HomotypicGroup<T>],
    ) -> Option<&'g mut HomotypicGroup<T>> {
        groups.iter_mut().find(|g| {
            self.comparator
                .compare_strict(authorship, g.authorship(), code, self.year_tolerance)
        })
    }

    fn find_ex_author_match<'g>(
        &self,
        code: Option<NomCode>,
        authorship: &Authorship,
        groups: &'g mut [HomotypicGroup<T>],
    ) -> Option<&'g mut HomotypicGroup<T>> {
        groups.iter_mut().find(|g| match g.ex_authorship() {
            Some(ex) => self.comparator.compare(authorship, ex, code) == Equality::Equal,
            None => false,
        })
    }
}
