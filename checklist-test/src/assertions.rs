//! Custom assertions for testing
//!
//! Provides specialized assertions on the state of an [`InMemoryStore`].

use crate::store::InMemoryStore;
use checklist_core::{Issue, NomRelType, TaxonomicStatus};
use std::collections::HashSet;

/// Assert that a relation between two name ids exists exactly once
pub fn assert_relation(store: &InMemoryStore, from: &str, to: &str, rel_type: NomRelType) {
    let count = store
        .relations()
        .iter()
        .filter(|r| r.name_id == from && r.related_name_id == to && r.rel_type == rel_type)
        .count();
    assert_eq!(
        count,
        1,
        "Expected one {} relation {} -> {}, found {} in {:?}",
        rel_type,
        from,
        to,
        count,
        store.relations()
    );
}

/// Assert that no relation of the given type starts at a name id
pub fn assert_no_relation_from(store: &InMemoryStore, from: &str, rel_type: NomRelType) {
    let found: Vec<_> = store
        .relations()
        .into_iter()
        .filter(|r| r.name_id == from && r.rel_type == rel_type)
        .collect();
    assert!(found.is_empty(), "Unexpected {} relations from {}: {:?}", rel_type, from, found);
}

/// Assert that relation creation stayed idempotent
pub fn assert_no_duplicate_relations(store: &InMemoryStore) {
    let relations = store.relations();
    let unique: HashSet<_> = relations.iter().map(|r| r.key()).collect();
    assert_eq!(
        relations.len(),
        unique.len(),
        "Found {} duplicate relations",
        relations.len() - unique.len()
    );
}

pub fn assert_status(store: &InMemoryStore, dataset_key: i32, id: &str, status: TaxonomicStatus) {
    let u = store
        .usage(dataset_key, id)
        .unwrap_or_else(|| panic!("Usage {} does not exist", id));
    assert_eq!(u.status, Some(status), "Unexpected status of {}", u);
}

/// Assert that a usage is a synonym pointing at the given accepted usage
pub fn assert_synonym_of(store: &InMemoryStore, dataset_key: i32, id: &str, accepted_id: &str) {
    let u = store
        .usage(dataset_key, id)
        .unwrap_or_else(|| panic!("Usage {} does not exist", id));
    assert!(u.is_synonym(), "{} is not a synonym but {:?}", u, u.status);
    assert_eq!(
        u.parent_id.as_deref(),
        Some(accepted_id),
        "{} is a synonym of the wrong usage",
        u
    );
}

pub fn assert_issue(store: &InMemoryStore, dataset_key: i32, id: &str, issue: Issue) {
    let issues = store.issues(dataset_key, id);
    assert!(issues.contains(&issue), "Usage {} lacks issue {:?}, has {:?}", id, issue, issues);
}

pub fn assert_no_issue(store: &InMemoryStore, dataset_key: i32, id: &str, issue: Issue) {
    let issues = store.issues(dataset_key, id);
    assert!(!issues.contains(&issue), "Usage {} unexpectedly has issue {:?}", id, issue);
}

pub fn assert_deleted(store: &InMemoryStore, dataset_key: i32, id: &str) {
    assert!(store.is_deleted(dataset_key, id), "Usage {} was not deleted", id);
    assert!(store.usage(dataset_key, id).is_none());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::usage;
    use checklist_core::NameRelation;

    #[test]
    fn test_relation_assertions() {
        let store = InMemoryStore::with_usages(1, vec![usage("1", "Abies alba", "L.").build()]);
        store.insert_relation(NameRelation::new(1, "n2", "n1", NomRelType::Basionym, 12));
        assert_relation(&store, "n2", "n1", NomRelType::Basionym);
        assert_no_relation_from(&store, "n1", NomRelType::Basionym);
        assert_no_duplicate_relations(&store);
        assert_status(&store, 1, "1", TaxonomicStatus::Accepted);
        assert_no_issue(&store, 1, "1", Issue::HomotypicConsolidation);
    }

    #[test]
    #[should_panic(expected = "duplicate relations")]
    fn test_duplicates_detected() {
        let store = InMemoryStore::new();
        store.insert_relation(NameRelation::new(1, "n2", "n1", NomRelType::Basionym, 12));
        store.insert_relation(NameRelation::new(1, "n2", "n1", NomRelType::Basionym, 99));
        assert_no_duplicate_relations(&store);
    }
}
