//! Runs one consolidation task per higher taxon on a local worker pool

use crate::priority::UsagePriority;
use crate::report::{ConsolidationReport, TaskFailure, TaskStats};
use crate::task::{ConsolidationContext, ConsolidationTask};
use checklist_core::{
    ChecklistError, ChecklistResult, ConsolidationConfig, SimpleName, TaxonomicStatus, UsageKey,
    UsageStore,
};
use checklist_names::{
    AuthorComparator, EpithetNormalizer, SciNameNormalizer, ScientificNameSimilarity,
    StandardAuthorComparator, StringSimilarity,
};
use rayon::prelude::*;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, info};

pub struct HomotypicConsolidator {
    ctx: ConsolidationContext,
    taxa: Vec<SimpleName>,
}

impl HomotypicConsolidator {
    /// Consolidate all accepted taxa of the configured root rank in a dataset
    pub fn entire_dataset(
        store: Arc<dyn UsageStore>,
        dataset_key: i32,
        config: ConsolidationConfig,
        priority: Arc<dyn UsagePriority>,
    ) -> ChecklistResult<Self> {
        config.validate()?;
        let taxa = {
            let session = store.session()?;
            session.find_simple(
                dataset_key,
                config.root_rank,
                &[TaxonomicStatus::Accepted, TaxonomicStatus::ProvisionallyAccepted],
            )?
        };
        info!(
            "Found {} {:?} taxa to consolidate in dataset {}",
            taxa.len(),
            config.root_rank,
            dataset_key
        );
        Self::for_taxa(store, dataset_key, config, priority, taxa)
    }

    /// Consolidate the subtrees of the given taxa, which must not overlap
    pub fn for_taxa(
        store: Arc<dyn UsageStore>,
        dataset_key: i32,
        config: ConsolidationConfig,
        priority: Arc<dyn UsagePriority>,
        taxa: Vec<SimpleName>,
    ) -> ChecklistResult<Self> {
        config.validate()?;
        let comparator = Arc::new(StandardAuthorComparator::new(config.year_tolerance));
        Ok(Self {
            ctx: ConsolidationContext {
                dataset_key,
                store,
                config,
                comparator,
                similarity: Arc::new(ScientificNameSimilarity::new()),
                normalizer: Arc::new(SciNameNormalizer::new()),
                priority,
            },
            taxa,
        })
    }

    pub fn with_comparator(mut self, comparator: Arc<dyn AuthorComparator>) -> Self {
        self.ctx.comparator = comparator;
        self
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn StringSimilarity>) -> Self {
        self.ctx.similarity = similarity;
        self
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn EpithetNormalizer>) -> Self {
        self.ctx.normalizer = normalizer;
        self
    }

    pub fn taxa(&self) -> &[SimpleName] {
        &self.taxa
    }

    pub fn context(&self) -> &ConsolidationContext {
        &self.ctx
    }

    /// Run all tasks and block until the pool has drained.
    ///
    /// Failing or panicking tasks are logged and recorded in the report, they
    /// never affect other tasks. Overlapping root taxa are rejected upfront.
    pub fn consolidate(&self) -> ChecklistResult<ConsolidationReport> {
        self.check_disjoint()?;

        let threads = self.ctx.config.effective_threads().max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("homotypic-{}", i))
            .build()
            .map_err(|e| ChecklistError::Other(format!("Failed to build thread pool: {}", e)))?;
        info!(
            "Consolidating {} taxa of dataset {} using {} threads",
            self.taxa.len(),
            self.ctx.dataset_key,
            threads
        );

        let results: Vec<Result<TaskStats, TaskFailure>> =
            pool.install(|| self.taxa.par_iter().map(|t| self.run_task(t)).collect());

        let mut report = ConsolidationReport::new(self.ctx.dataset_key);
        for r in results {
            match r {
                Ok(stats) => report.tasks.push(stats),
                Err(failure) => report.failures.push(failure),
            }
        }
        let totals = report.totals();
        info!(
            "Homotypic consolidation of dataset {} finished: {} tasks, {} failed, {} groups, {} relations, {} synonyms, {} deleted, {} unresolved",
            self.ctx.dataset_key,
            report.tasks.len(),
            report.failures.len(),
            totals.groups,
            totals.relations(),
            totals.synonyms_converted,
            totals.usages_deleted,
            totals.unresolved_groups
        );
        Ok(report)
    }

    fn run_task(&self, taxon: &SimpleName) -> Result<TaskStats, TaskFailure> {
        let task = ConsolidationTask::new(&self.ctx, taxon.clone());
        let reason = match catch_unwind(AssertUnwindSafe(|| task.run())) {
            Ok(Ok(stats)) => return Ok(stats),
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic),
        };
        let err = ChecklistError::task(taxon.label(), &reason);
        error!("{}", err);
        Err(TaskFailure {
            taxon_id: taxon.id.clone(),
            taxon: taxon.label(),
            reason,
        })
    }

    /// Two tasks must never touch the same subtree
    fn check_disjoint(&self) -> ChecklistResult<()> {
        let mut roots: HashMap<&str, &SimpleName> = HashMap::new();
        for t in &self.taxa {
            if roots.insert(t.id.as_str(), t).is_some() {
                return Err(ChecklistError::InvalidInput(format!("Duplicate root taxon {}", t)));
            }
        }
        let session = self.ctx.store.session()?;
        for t in &self.taxa {
            let key = UsageKey::new(self.ctx.dataset_key, t.id.clone());
            for id in session.classification_ids(&key)? {
                if let Some(outer) = roots.get(id.as_str()) {
                    return Err(ChecklistError::InvalidInput(format!(
                        "Root taxon {} is nested within root taxon {}",
                        t, outer
                    )));
                }
            }
        }
        Ok(())
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let p = catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(p), "panicked: boom");
        let p = catch_unwind(|| panic!("{} failed", "task")).unwrap_err();
        assert_eq!(panic_message(p), "panicked: task failed");
        let p = catch_unwind(|| std::panic::panic_any(7)).unwrap_err();
        assert_eq!(panic_message(p), "panicked");
    }
}
