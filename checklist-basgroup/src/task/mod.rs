//! Homotypic consolidation of the subtree below a single higher taxon
//!
//! A task materializes all usages of its subtree into an identity map owned
//! by the task, buckets them by normalized terminal epithet, merges
//! orthographic variants, sorts each bucket into homotypic groups and finally
//! persists relations and consolidates the status of every group. All writes
//! go through short lived store sessions, one per logical unit of work.
mod relations;
mod status;

use crate::group::HomotypicGroup;
use crate::orthography::OrthographicVariantClusterer;
use crate::priority::UsagePriority;
use crate::report::TaskStats;
use crate::sorter::BasionymSorter;
use checklist_core::{
    ChecklistResult, ConsolidationConfig, LinneanNameUsage, NameType, NomCode, SimpleName,
    TreeTraversal, UsageKey, UsageStore,
};
use checklist_names::{AuthorComparator, EpithetNormalizer, FormattableName, StringSimilarity};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a task needs besides its root taxon, shared read-only across workers
pub struct ConsolidationContext {
    pub dataset_key: i32,
    pub store: Arc<dyn UsageStore>,
    pub config: ConsolidationConfig,
    pub comparator: Arc<dyn AuthorComparator>,
    pub similarity: Arc<dyn StringSimilarity>,
    pub normalizer: Arc<dyn EpithetNormalizer>,
    pub priority: Arc<dyn UsagePriority>,
}

impl ConsolidationContext {
    pub fn priority(&self, usage: &LinneanNameUsage) -> i32 {
        self.priority.priority(usage)
    }

    pub fn key(&self, id: &str) -> UsageKey {
        UsageKey::new(self.dataset_key, id)
    }
}

pub(crate) fn as_name(u: &LinneanNameUsage) -> &dyn FormattableName {
    u
}

pub type UsageGroup = HomotypicGroup<LinneanNameUsage>;

pub struct ConsolidationTask<'a> {
    ctx: &'a ConsolidationContext,
    taxon: SimpleName,
    usages: HashMap<String, LinneanNameUsage>,
    stats: TaskStats,
}

impl<'a> ConsolidationTask<'a> {
    pub fn new(ctx: &'a ConsolidationContext, taxon: SimpleName) -> Self {
        let stats = TaskStats::new(taxon.label());
        Self {
            ctx,
            taxon,
            usages: HashMap::new(),
            stats,
        }
    }

    pub fn taxon(&self) -> &SimpleName {
        &self.taxon
    }

    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    /// Current in-memory state of a traversed usage
    pub fn usage(&self, id: &str) -> Option<&LinneanNameUsage> {
        self.usages.get(id)
    }

    fn code(&self) -> Option<NomCode> {
        self.taxon.code
    }

    /// Consolidate the entire subtree and return the collected counters
    pub fn run(mut self) -> ChecklistResult<TaskStats> {
        info!("Start homotypic consolidation of {}", self.taxon);
        let mut buckets = self.load()?;
        self.stats.epithets = buckets.len();

        if self.ctx.config.detect_orthographic_variants {
            let clusterer = OrthographicVariantClusterer::new(
                self.ctx.comparator.as_ref(),
                self.ctx.similarity.as_ref(),
                self.ctx.config.similarity_threshold,
            )
            .with_year_tolerance(self.ctx.config.year_tolerance);
            self.stats.orthographic_variants = clusterer.cluster(self.code(), &mut buckets, as_name);
        }

        for (epithet, elements) in buckets {
            if elements.len() < 2 {
                continue;
            }
            for group in self.group(&epithet, elements) {
                if group.size() > 1 {
                    self.process_group(&group)?;
                }
            }
        }

        info!(
            "Homotypic consolidation of {} done: {} usages, {} groups, {} relations, {} synonyms, {} deleted, {} unresolved",
            self.taxon,
            self.stats.usages,
            self.stats.groups,
            self.stats.relations(),
            self.stats.synonyms_converted,
            self.stats.usages_deleted,
            self.stats.unresolved_groups
        );
        Ok(self.stats)
    }

    /// Traverse the subtree into the identity map and bucket the candidates by normalized epithet
    pub fn load(&mut self) -> ChecklistResult<BTreeMap<String, Vec<LinneanNameUsage>>> {
        let ctx = self.ctx;
        let traversal = TreeTraversal::new(ctx.dataset_key, self.taxon.id.clone())
            .with_synonyms(ctx.config.include_synonyms);
        let exclusions = ctx.config.exclusions_for(&self.taxon.name);
        let mut buckets: BTreeMap<String, Vec<LinneanNameUsage>> = BTreeMap::new();

        let session = ctx.store.session()?;
        for u in session.process_tree(&traversal)? {
            let u = u?;
            let candidate = match u.terminal_epithet() {
                _ if u.name_type == NameType::Otu || u.rank.is_supraspecific() || u.is_autonym() => None,
                Some(epithet) => {
                    let key = ctx.normalizer.normalize_epithet(epithet);
                    match exclusions {
                        Some(ex) if ex.contains(epithet) || ex.contains(&key) => {
                            debug!("Exclude {} from homotypic grouping in {}", u.label(), self.taxon.name);
                            None
                        }
                        _ => Some(key),
                    }
                }
                None => None,
            };
            if let Some(key) = candidate {
                buckets.entry(key).or_default().push(u.clone());
                self.stats.usages += 1;
            }
            self.usages.insert(u.id.clone(), u);
        }
        debug!(
            "Loaded {} usages with {} distinct epithets below {}",
            self.usages.len(),
            buckets.len(),
            self.taxon
        );
        Ok(buckets)
    }

    /// Sort one epithet bucket into homotypic groups
    pub fn group(&mut self, epithet: &str, elements: Vec<LinneanNameUsage>) -> Vec<UsageGroup> {
        let ctx = self.ctx;
        let code = self.code().or_else(|| elements.first().and_then(|u| u.code));
        let sorter = BasionymSorter::new(ctx.comparator.as_ref(), |u: &LinneanNameUsage| ctx.priority(u))
            .with_year_tolerance(ctx.config.year_tolerance);
        let mut unauthored = 0;
        let groups = sorter.group_basionyms(code, epithet, elements, as_name, |_| unauthored += 1);
        self.stats.unauthored += unauthored;
        groups
    }

    /// Persist relations and consolidate the status of a single group
    pub fn process_group(&mut self, group: &UsageGroup) -> ChecklistResult<()> {
        self.stats.groups += 1;
        debug!(
            "Homotypic group {} {} with {} members in {}",
            group.epithet(),
            group.authorship(),
            group.size(),
            self.taxon.name
        );
        self.persist_relations(group)?;
        self.consolidate(group)
    }

    /// Latest known state of a group member, falling back to the grouped copy
    fn current(&self, u: &LinneanNameUsage) -> LinneanNameUsage {
        self.usages.get(&u.id).cloned().unwrap_or_else(|| u.clone())
    }

    /// Look up a usage in the identity map or load it from the store
    fn load_usage(&self, id: &str) -> ChecklistResult<Option<LinneanNameUsage>> {
        if let Some(u) = self.usages.get(id) {
            return Ok(Some(u.clone()));
        }
        let session = self.ctx.store.session()?;
        let u = session.get_usage(&self.ctx.key(id))?;
        if u.is_none() {
            warn!("Usage {} not found in dataset {}", id, self.ctx.dataset_key);
        }
        Ok(u)
    }

    /// The usage itself if accepted, otherwise its accepted parent
    fn accepted_usage(&self, u: &LinneanNameUsage) -> ChecklistResult<Option<LinneanNameUsage>> {
        if u.is_taxon() {
            return Ok(Some(u.clone()));
        }
        match u.parent_id.as_deref() {
            Some(pid) => self.load_usage(pid),
            None => Ok(None),
        }
    }
}
