/// Persistence interface of the checklist tree
///
/// The consolidation engine never talks to a database directly. It opens a
/// [`StoreSession`] per logical unit of work, reads and writes through it and
/// commits at the end. A session dropped without `commit` must discard its
/// writes.
use crate::error::ChecklistResult;
use crate::types::{
    Issue, LinneanNameUsage, NameRelation, Rank, SimpleName, TaxonomicStatus, UsageKey,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters of a pre-order subtree traversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeTraversal {
    pub dataset_key: i32,
    pub root_id: String,
    /// Follow synonym children as well as accepted children
    pub include_synonyms: bool,
}

impl TreeTraversal {
    pub fn new(dataset_key: i32, root_id: impl Into<String>) -> Self {
        Self {
            dataset_key,
            root_id: root_id.into(),
            include_synonyms: true,
        }
    }

    pub fn with_synonyms(mut self, include_synonyms: bool) -> Self {
        self.include_synonyms = include_synonyms;
        self
    }

    pub fn root_key(&self) -> UsageKey {
        UsageKey::new(self.dataset_key, self.root_id.clone())
    }
}

/// Streaming cursor over the usages of a subtree
pub type UsageCursor<'a> = Box<dyn Iterator<Item = ChecklistResult<LinneanNameUsage>> + 'a>;

/// Entry point into a store, shared read-only between worker threads
pub trait UsageStore: Send + Sync {
    /// Open a new unit of work
    fn session(&self) -> ChecklistResult<Box<dyn StoreSession + '_>>;
}

/// A single unit of work against the store
pub trait StoreSession {
    /// Lazily traverse a subtree in pre-order, starting with the root itself
    fn process_tree(&self, traversal: &TreeTraversal) -> ChecklistResult<UsageCursor<'_>>;

    fn get_usage(&self, key: &UsageKey) -> ChecklistResult<Option<LinneanNameUsage>>;

    fn get_simple(&self, key: &UsageKey) -> ChecklistResult<Option<SimpleName>>;

    /// All usages of a dataset with the given rank and one of the given statuses
    fn find_simple(
        &self,
        dataset_key: i32,
        rank: Rank,
        statuses: &[TaxonomicStatus],
    ) -> ChecklistResult<Vec<SimpleName>>;

    /// Synonyms pointing at the given accepted usage
    fn list_synonyms(&self, key: &UsageKey) -> ChecklistResult<Vec<SimpleName>>;

    /// Ids of all ancestors of a usage, nearest parent first, excluding the usage itself
    fn classification_ids(&self, key: &UsageKey) -> ChecklistResult<Vec<String>>;

    /// Sector key to sector priority, lower is more trusted
    fn sector_priorities(&self, dataset_key: i32) -> ChecklistResult<HashMap<i32, i32>>;

    /// Existence check keyed by dataset, from name, to name and relation type
    fn relation_exists(&self, rel: &NameRelation) -> ChecklistResult<bool>;

    fn create_relation(&mut self, rel: NameRelation) -> ChecklistResult<()>;

    fn update_parent(&mut self, key: &UsageKey, parent_id: &str, user: i32) -> ChecklistResult<()>;

    fn update_parent_and_status(
        &mut self,
        key: &UsageKey,
        parent_id: &str,
        status: TaxonomicStatus,
        user: i32,
    ) -> ChecklistResult<()>;

    /// Attach an issue to the verbatim source record of a usage
    fn add_issue(&mut self, key: &UsageKey, issue: Issue) -> ChecklistResult<()>;

    /// Remove a usage together with its verbatim source record
    fn delete_usage(&mut self, key: &UsageKey) -> ChecklistResult<()>;

    fn commit(self: Box<Self>) -> ChecklistResult<()>;
}
