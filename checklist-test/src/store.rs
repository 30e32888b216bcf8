//! Transactional in-memory usage store
//!
//! Every session works on its own copy of the store state and journals its
//! writes. `commit` replays the journal onto the shared state under the write
//! lock, a session dropped without commit simply discards its copy. Sessions of
//! concurrent tasks working on disjoint subtrees therefore never lose each
//! other's writes.

use checklist_core::{
    ChecklistError, ChecklistResult, Issue, LinneanNameUsage, NameRelation, Rank, SimpleName,
    StoreSession, TaxonomicStatus, TreeTraversal, UsageCursor, UsageKey, UsageStore,
};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Where the store should fail on purpose
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePoint {
    /// Traversal of the subtree with this root id returns an error
    Traversal(String),
    /// Traversal of the subtree with this root id panics
    TraversalPanic(String),
    /// Any update or deletion of this usage id returns an error
    Update(String),
    /// Every commit returns an error
    Commit,
}

#[derive(Debug, Clone)]
enum Op {
    CreateRelation(NameRelation),
    UpdateParent { key: UsageKey, parent_id: String, user: i32 },
    UpdateParentAndStatus { key: UsageKey, parent_id: String, status: TaxonomicStatus, user: i32 },
    AddIssue { key: UsageKey, issue: Issue },
    Delete(UsageKey),
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    usages: BTreeMap<UsageKey, LinneanNameUsage>,
    relations: Vec<NameRelation>,
    issues: BTreeMap<UsageKey, BTreeSet<Issue>>,
    modified_by: BTreeMap<UsageKey, i32>,
    deleted: BTreeSet<UsageKey>,
    sector_priorities: HashMap<i32, HashMap<i32, i32>>,
}

impl StoreState {
    fn usage_mut(&mut self, key: &UsageKey) -> ChecklistResult<&mut LinneanNameUsage> {
        self.usages
            .get_mut(key)
            .ok_or_else(|| ChecklistError::NotFound(format!("usage {}", key)))
    }

    fn apply(&mut self, op: &Op) -> ChecklistResult<()> {
        match op {
            Op::CreateRelation(rel) => {
                if !self.relations.iter().any(|r| r.key() == rel.key()) {
                    self.relations.push(rel.clone());
                }
            }
            Op::UpdateParent { key, parent_id, user } => {
                self.usage_mut(key)?.parent_id = Some(parent_id.clone());
                self.modified_by.insert(key.clone(), *user);
            }
            Op::UpdateParentAndStatus { key, parent_id, status, user } => {
                let u = self.usage_mut(key)?;
                u.parent_id = Some(parent_id.clone());
                u.status = Some(*status);
                self.modified_by.insert(key.clone(), *user);
            }
            Op::AddIssue { key, issue } => {
                if !self.usages.contains_key(key) {
                    return Err(ChecklistError::NotFound(format!("verbatim source of {}", key)));
                }
                self.issues.entry(key.clone()).or_default().insert(*issue);
            }
            Op::Delete(key) => {
                if self.usages.remove(key).is_none() {
                    return Err(ChecklistError::NotFound(format!("usage {}", key)));
                }
                self.deleted.insert(key.clone());
            }
        }
        Ok(())
    }

    /// Children of every usage of a dataset, ordered by id
    fn children(&self, dataset_key: i32) -> HashMap<&str, Vec<&LinneanNameUsage>> {
        let mut children: HashMap<&str, Vec<&LinneanNameUsage>> = HashMap::new();
        for (key, u) in &self.usages {
            if key.dataset_key != dataset_key {
                continue;
            }
            if let Some(pid) = u.parent_id.as_deref() {
                children.entry(pid).or_default().push(u);
            }
        }
        children
    }

    fn pre_order(&self, traversal: &TreeTraversal) -> ChecklistResult<Vec<LinneanNameUsage>> {
        let root = self
            .usages
            .get(&traversal.root_key())
            .ok_or_else(|| ChecklistError::NotFound(format!("root usage {}", traversal.root_key())))?;
        let children = self.children(traversal.dataset_key);
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            if !visited.insert(u.id.as_str()) {
                continue;
            }
            result.push(u.clone());
            if let Some(kids) = children.get(u.id.as_str()) {
                // reversed so the smallest id is visited first
                for kid in kids.iter().rev() {
                    if traversal.include_synonyms || !kid.is_synonym() {
                        stack.push(kid);
                    }
                }
            }
        }
        Ok(result)
    }
}

/// Usage store keeping everything in memory, cheap to clone and share
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
    failures: Arc<Mutex<Vec<FailurePoint>>>,
    commits: Arc<AtomicUsize>,
    sessions: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated usages of one dataset
    pub fn with_usages(dataset_key: i32, usages: impl IntoIterator<Item = LinneanNameUsage>) -> Self {
        let store = Self::new();
        for u in usages {
            store.insert(dataset_key, u);
        }
        store
    }

    pub fn insert(&self, dataset_key: i32, usage: LinneanNameUsage) {
        let key = UsageKey::new(dataset_key, usage.id.clone());
        self.state.write().usages.insert(key, usage);
    }

    pub fn insert_relation(&self, rel: NameRelation) {
        self.state.write().relations.push(rel);
    }

    pub fn set_sector_priorities(&self, dataset_key: i32, priorities: HashMap<i32, i32>) {
        self.state.write().sector_priorities.insert(dataset_key, priorities);
    }

    pub fn fail_at(&self, point: FailurePoint) {
        self.failures.lock().push(point);
    }

    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    fn should_fail(&self, point: &FailurePoint) -> bool {
        self.failures.lock().contains(point)
    }

    pub fn usage(&self, dataset_key: i32, id: &str) -> Option<LinneanNameUsage> {
        self.state.read().usages.get(&UsageKey::new(dataset_key, id)).cloned()
    }

    pub fn usage_count(&self, dataset_key: i32) -> usize {
        self.state
            .read()
            .usages
            .keys()
            .filter(|k| k.dataset_key == dataset_key)
            .count()
    }

    pub fn relations(&self) -> Vec<NameRelation> {
        self.state.read().relations.clone()
    }

    pub fn issues(&self, dataset_key: i32, id: &str) -> BTreeSet<Issue> {
        self.state
            .read()
            .issues
            .get(&UsageKey::new(dataset_key, id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn modified_by(&self, dataset_key: i32, id: &str) -> Option<i32> {
        self.state.read().modified_by.get(&UsageKey::new(dataset_key, id)).copied()
    }

    pub fn is_deleted(&self, dataset_key: i32, id: &str) -> bool {
        self.state.read().deleted.contains(&UsageKey::new(dataset_key, id))
    }

    /// Number of successful commits so far
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of sessions opened so far
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

impl UsageStore for InMemoryStore {
    fn session(&self) -> ChecklistResult<Box<dyn StoreSession + '_>> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            store: self,
            state: self.state.read().clone(),
            journal: Vec::new(),
        }))
    }
}

pub struct InMemorySession<'a> {
    store: &'a InMemoryStore,
    state: StoreState,
    journal: Vec<Op>,
}

impl InMemorySession<'_> {
    fn write(&mut self, op: Op) -> ChecklistResult<()> {
        let target = match &op {
            Op::UpdateParent { key, .. } | Op::UpdateParentAndStatus { key, .. } | Op::Delete(key) => {
                Some(key.id.clone())
            }
            _ => None,
        };
        if let Some(id) = target {
            if self.store.should_fail(&FailurePoint::Update(id.clone())) {
                return Err(ChecklistError::Storage(format!("injected update failure for {}", id)));
            }
        }
        self.state.apply(&op)?;
        self.journal.push(op);
        Ok(())
    }
}

impl StoreSession for InMemorySession<'_> {
    fn process_tree(&self, traversal: &TreeTraversal) -> ChecklistResult<UsageCursor<'_>> {
        if self.store.should_fail(&FailurePoint::TraversalPanic(traversal.root_id.clone())) {
            panic!("injected traversal panic for {}", traversal.root_id);
        }
        if self.store.should_fail(&FailurePoint::Traversal(traversal.root_id.clone())) {
            return Err(ChecklistError::Storage(format!(
                "injected traversal failure for {}",
                traversal.root_id
            )));
        }
        let usages = self.state.pre_order(traversal)?;
        Ok(Box::new(usages.into_iter().map(Ok)))
    }

    fn get_usage(&self, key: &UsageKey) -> ChecklistResult<Option<LinneanNameUsage>> {
        Ok(self.state.usages.get(key).cloned())
    }

    fn get_simple(&self, key: &UsageKey) -> ChecklistResult<Option<SimpleName>> {
        Ok(self.state.usages.get(key).map(LinneanNameUsage::to_simple))
    }

    fn find_simple(
        &self,
        dataset_key: i32,
        rank: Rank,
        statuses: &[TaxonomicStatus],
    ) -> ChecklistResult<Vec<SimpleName>> {
        Ok(self
            .state
            .usages
            .iter()
            .filter(|(k, u)| {
                k.dataset_key == dataset_key
                    && u.rank == rank
                    && u.status.map(|s| statuses.contains(&s)).unwrap_or(false)
            })
            .map(|(_, u)| u.to_simple())
            .collect())
    }

    fn list_synonyms(&self, key: &UsageKey) -> ChecklistResult<Vec<SimpleName>> {
        Ok(self
            .state
            .usages
            .iter()
            .filter(|(k, u)| {
                k.dataset_key == key.dataset_key
                    && u.is_synonym()
                    && u.parent_id.as_deref() == Some(key.id.as_str())
            })
            .map(|(_, u)| u.to_simple())
            .collect())
    }

    fn classification_ids(&self, key: &UsageKey) -> ChecklistResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut current = self
            .state
            .usages
            .get(key)
            .ok_or_else(|| ChecklistError::NotFound(format!("usage {}", key)))?;
        while let Some(pid) = current.parent_id.as_deref() {
            if pid == key.id || ids.iter().any(|id| id == pid) {
                break;
            }
            ids.push(pid.to_string());
            match self.state.usages.get(&key.with_id(pid)) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Ok(ids)
    }

    fn sector_priorities(&self, dataset_key: i32) -> ChecklistResult<HashMap<i32, i32>> {
        Ok(self
            .state
            .sector_priorities
            .get(&dataset_key)
            .cloned()
            .unwrap_or_default())
    }

    fn relation_exists(&self, rel: &NameRelation) -> ChecklistResult<bool> {
        Ok(self.state.relations.iter().any(|r| r.key() == rel.key()))
    }

    fn create_relation(&mut self, rel: NameRelation) -> ChecklistResult<()> {
        self.write(Op::CreateRelation(rel))
    }

    fn update_parent(&mut self, key: &UsageKey, parent_id: &str, user: i32) -> ChecklistResult<()> {
        self.write(Op::UpdateParent {
            key: key.clone(),
            parent_id: parent_id.to_string(),
            user,
        })
    }

    fn update_parent_and_status(
        &mut self,
        key: &UsageKey,
        parent_id: &str,
        status: TaxonomicStatus,
        user: i32,
    ) -> ChecklistResult<()> {
        self.write(Op::UpdateParentAndStatus {
            key: key.clone(),
            parent_id: parent_id.to_string(),
            status,
            user,
        })
    }

    fn add_issue(&mut self, key: &UsageKey, issue: Issue) -> ChecklistResult<()> {
        self.write(Op::AddIssue {
            key: key.clone(),
            issue,
        })
    }

    fn delete_usage(&mut self, key: &UsageKey) -> ChecklistResult<()> {
        self.write(Op::Delete(key.clone()))
    }

    fn commit(self: Box<Self>) -> ChecklistResult<()> {
        if self.store.should_fail(&FailurePoint::Commit) {
            return Err(ChecklistError::Storage("injected commit failure".to_string()));
        }
        let mut shared = self.store.state.write();
        for op in &self.journal {
            shared.apply(op)?;
        }
        self.store.commits.fetch_add(1, Ordering::SeqCst);
        debug!("Committed {} writes", self.journal.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklist_core::NomRelType;

    const DS: i32 = 3;

    fn usage(id: &str, parent: Option<&str>, status: TaxonomicStatus, rank: Rank) -> LinneanNameUsage {
        LinneanNameUsage {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            status: Some(status),
            rank,
            scientific_name: id.to_string(),
            ..Default::default()
        }
    }

    fn tree() -> InMemoryStore {
        InMemoryStore::with_usages(
            DS,
            vec![
                usage("fam", None, TaxonomicStatus::Accepted, Rank::Family),
                usage("gen", Some("fam"), TaxonomicStatus::Accepted, Rank::Genus),
                usage("sp2", Some("gen"), TaxonomicStatus::Accepted, Rank::Species),
                usage("sp1", Some("gen"), TaxonomicStatus::Accepted, Rank::Species),
                usage("syn", Some("sp1"), TaxonomicStatus::Synonym, Rank::Species),
            ],
        )
    }

    fn ids(session: &dyn StoreSession, traversal: &TreeTraversal) -> Vec<String> {
        session
            .process_tree(traversal)
            .unwrap()
            .map(|u| u.unwrap().id)
            .collect()
    }

    #[test]
    fn test_pre_order_traversal() {
        let store = tree();
        let session = store.session().unwrap();
        let t = TreeTraversal::new(DS, "fam");
        assert_eq!(ids(&*session, &t), vec!["fam", "gen", "sp1", "syn", "sp2"]);
        let t = t.with_synonyms(false);
        assert_eq!(ids(&*session, &t), vec!["fam", "gen", "sp1", "sp2"]);
    }

    #[test]
    fn test_uncommitted_session_is_rolled_back() {
        let store = tree();
        {
            let mut session = store.session().unwrap();
            session
                .update_parent_and_status(&UsageKey::new(DS, "sp2"), "sp1", TaxonomicStatus::Synonym, 12)
                .unwrap();
            // reads within the session see the write
            assert_eq!(session.list_synonyms(&UsageKey::new(DS, "sp1")).unwrap().len(), 2);
        }
        assert_eq!(store.usage(DS, "sp2").unwrap().status, Some(TaxonomicStatus::Accepted));
        assert_eq!(store.commits(), 0);
    }

    #[test]
    fn test_commit_replays_writes() {
        let store = tree();
        let mut session = store.session().unwrap();
        let rel = NameRelation::new(DS, "n1", "n2", NomRelType::Basionym, 12);
        session.create_relation(rel.clone()).unwrap();
        assert!(session.relation_exists(&rel).unwrap());
        session.add_issue(&UsageKey::new(DS, "sp1"), Issue::HomotypicConsolidation).unwrap();
        session.delete_usage(&UsageKey::new(DS, "syn")).unwrap();
        session.commit().unwrap();

        assert_eq!(store.relations(), vec![rel]);
        assert!(store.issues(DS, "sp1").contains(&Issue::HomotypicConsolidation));
        assert!(store.is_deleted(DS, "syn"));
        assert!(store.usage(DS, "syn").is_none());
        assert_eq!(store.commits(), 1);
    }

    #[test]
    fn test_classification() {
        let store = tree();
        let session = store.session().unwrap();
        assert_eq!(
            session.classification_ids(&UsageKey::new(DS, "syn")).unwrap(),
            vec!["sp1", "gen", "fam"]
        );
        assert!(session.classification_ids(&UsageKey::new(DS, "fam")).unwrap().is_empty());
        assert!(session.classification_ids(&UsageKey::new(DS, "nope")).is_err());
    }

    #[test]
    fn test_injected_failures() {
        let store = tree();
        store.fail_at(FailurePoint::Update("sp1".to_string()));
        let mut session = store.session().unwrap();
        let err = session.update_parent(&UsageKey::new(DS, "sp1"), "fam", 12).unwrap_err();
        assert!(err.is_storage());
        drop(session);

        store.fail_at(FailurePoint::Commit);
        let session = store.session().unwrap();
        assert!(session.commit().is_err());
        store.clear_failures();
        assert!(store.session().unwrap().commit().is_ok());
    }

    #[test]
    fn test_find_simple() {
        let store = tree();
        let session = store.session().unwrap();
        let fams = session
            .find_simple(DS, Rank::Family, &[TaxonomicStatus::Accepted])
            .unwrap();
        assert_eq!(fams.len(), 1);
        assert_eq!(fams[0].id, "fam");
        assert!(session
            .find_simple(DS, Rank::Family, &[TaxonomicStatus::Synonym])
            .unwrap()
            .is_empty());
    }
}
