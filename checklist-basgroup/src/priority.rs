use checklist_core::{ChecklistResult, LinneanNameUsage, UsageStore};
use std::collections::HashMap;
use tracing::debug;

/// Trust ranking of a usage, lower numbers win
pub trait UsagePriority: Send + Sync {
    fn priority(&self, usage: &LinneanNameUsage) -> i32;
}

impl<F> UsagePriority for F
where
    F: Fn(&LinneanNameUsage) -> i32 + Send + Sync,
{
    fn priority(&self, usage: &LinneanNameUsage) -> i32 {
        self(usage)
    }
}

/// Priority derived from the sector a usage was merged from.
///
/// Usages without a sector were created by editors of the project itself and
/// rank highest. Sectors missing from the table rank lowest.
#[derive(Debug, Clone, Default)]
pub struct SectorPriority {
    priorities: HashMap<i32, i32>,
}

impl SectorPriority {
    pub fn new(priorities: HashMap<i32, i32>) -> Self {
        Self { priorities }
    }

    pub fn load(store: &dyn UsageStore, dataset_key: i32) -> ChecklistResult<Self> {
        let session = store.session()?;
        let priorities = session.sector_priorities(dataset_key)?;
        debug!("Loaded {} sector priorities for dataset {}", priorities.len(), dataset_key);
        Ok(Self::new(priorities))
    }
}

impl UsagePriority for SectorPriority {
    fn priority(&self, usage: &LinneanNameUsage) -> i32 {
        match usage.sector_key {
            None => 0,
            Some(sk) => self.priorities.get(&sk).copied().unwrap_or(i32::MAX),
        }
    }
}
