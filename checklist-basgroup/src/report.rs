//! Counters collected while consolidating, per task and per run

use checklist_core::{ChecklistResult, NomRelType};
use serde::{Deserialize, Serialize};

/// Statistics of a single consolidation task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStats {
    /// Label of the root taxon
    pub taxon: String,
    pub usages: usize,
    pub epithets: usize,
    pub unauthored: usize,
    pub orthographic_variants: usize,
    pub groups: usize,
    pub basionym_relations: usize,
    pub homotypic_relations: usize,
    pub based_on_relations: usize,
    pub spelling_relations: usize,
    pub synonyms_converted: usize,
    pub usages_deleted: usize,
    pub unresolved_groups: usize,
    pub multiple_basionyms: usize,
}

impl TaskStats {
    pub fn new(taxon: impl Into<String>) -> Self {
        Self {
            taxon: taxon.into(),
            ..Default::default()
        }
    }

    pub fn relation_created(&mut self, rel_type: NomRelType) {
        match rel_type {
            NomRelType::Basionym => self.basionym_relations += 1,
            NomRelType::Homotypic => self.homotypic_relations += 1,
            NomRelType::BasedOn => self.based_on_relations += 1,
            NomRelType::SpellingCorrection => self.spelling_relations += 1,
        }
    }

    pub fn relations(&self) -> usize {
        self.basionym_relations + self.homotypic_relations + self.based_on_relations + self.spelling_relations
    }

    /// Add the counters of another task, keeping this taxon label
    pub fn merge(&mut self, other: &TaskStats) {
        self.usages += other.usages;
        self.epithets += other.epithets;
        self.unauthored += other.unauthored;
        self.orthographic_variants += other.orthographic_variants;
        self.groups += other.groups;
        self.basionym_relations += other.basionym_relations;
        self.homotypic_relations += other.homotypic_relations;
        self.based_on_relations += other.based_on_relations;
        self.spelling_relations += other.spelling_relations;
        self.synonyms_converted += other.synonyms_converted;
        self.usages_deleted += other.usages_deleted;
        self.unresolved_groups += other.unresolved_groups;
        self.multiple_basionyms += other.multiple_basionyms;
    }
}

/// A task that failed or panicked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub taxon_id: String,
    pub taxon: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    pub dataset_key: i32,
    pub tasks: Vec<TaskStats>,
    pub failures: Vec<TaskFailure>,
}

impl ConsolidationReport {
    pub fn new(dataset_key: i32) -> Self {
        Self {
            dataset_key,
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Sum of all task counters
    pub fn totals(&self) -> TaskStats {
        let mut total = TaskStats::new(format!("dataset {}", self.dataset_key));
        for t in &self.tasks {
            total.merge(t);
        }
        total
    }

    pub fn to_json(&self) -> ChecklistResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_relation_counters() {
        let mut stats = TaskStats::new("Pinaceae");
        stats.relation_created(NomRelType::Basionym);
        stats.relation_created(NomRelType::Basionym);
        stats.relation_created(NomRelType::SpellingCorrection);
        assert_eq!(stats.basionym_relations, 2);
        assert_eq!(stats.spelling_relations, 1);
        assert_eq!(stats.relations(), 3);
    }

    #[test]
    fn test_totals() {
        let mut report = ConsolidationReport::new(3);
        let mut a = TaskStats::new("Pinaceae");
        a.usages = 10;
        a.synonyms_converted = 1;
        let mut b = TaskStats::new("Poaceae");
        b.usages = 5;
        b.usages_deleted = 2;
        report.tasks = vec![a, b];

        let total = report.totals();
        assert_eq!(total.taxon, "dataset 3");
        assert_eq!(total.usages, 15);
        assert_eq!(total.synonyms_converted, 1);
        assert_eq!(total.usages_deleted, 2);
        assert!(report.is_success());
    }

    #[test]
    fn test_json() {
        let mut report = ConsolidationReport::new(3);
        report.failures.push(TaskFailure {
            taxon_id: "f1".to_string(),
            taxon: "Pinaceae".to_string(),
            reason: "Storage error: gone".to_string(),
        });
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["dataset_key"], 3);
        assert_eq!(json["failures"][0]["taxon"], "Pinaceae");
        assert!(!report.is_success());
    }
}
