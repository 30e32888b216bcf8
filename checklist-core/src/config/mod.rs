//! Configuration types for homotypic consolidation

use crate::types::{Rank, HOMOTYPIC_GROUPER};
use crate::ChecklistError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationConfig {
    /// Worker threads, 0 uses all available cores
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Also traverse synonym branches of each root taxon
    #[serde(default = "default_include_synonyms")]
    pub include_synonyms: bool,
    /// Rank of the root taxa when consolidating an entire dataset
    #[serde(default = "default_root_rank")]
    pub root_rank: Rank,
    /// Minimum full name similarity (0-100) for orthographic variants
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Allowed difference in years for a strict authorship match
    #[serde(default = "default_year_tolerance")]
    pub year_tolerance: u32,
    #[serde(default = "default_detect_orthographic_variants")]
    pub detect_orthographic_variants: bool,
    /// Flag recombinations with BASIONYM_DERIVED when a basionym relation is created
    #[serde(default = "default_flag_derived_basionyms")]
    pub flag_derived_basionyms: bool,
    /// Editor key stamped on created relations and updated usages
    #[serde(default = "default_user_key")]
    pub user_key: i32,
    /// Epithets to skip, keyed by the name of the root taxon
    #[serde(default)]
    pub basionym_exclusions: BTreeMap<String, BTreeSet<String>>,
}

// Default value functions
fn default_threads() -> usize { 4 }
fn default_include_synonyms() -> bool { true }
fn default_root_rank() -> Rank { Rank::Family }
fn default_similarity_threshold() -> f64 { 92.0 }
fn default_year_tolerance() -> u32 { 2 }
fn default_detect_orthographic_variants() -> bool { true }
fn default_flag_derived_basionyms() -> bool { false }
fn default_user_key() -> i32 { HOMOTYPIC_GROUPER }

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            include_synonyms: default_include_synonyms(),
            root_rank: default_root_rank(),
            similarity_threshold: default_similarity_threshold(),
            year_tolerance: default_year_tolerance(),
            detect_orthographic_variants: default_detect_orthographic_variants(),
            flag_derived_basionyms: default_flag_derived_basionyms(),
            user_key: default_user_key(),
            basionym_exclusions: BTreeMap::new(),
        }
    }
}

impl ConsolidationConfig {
    /// Epithets excluded from consolidation within the given root taxon
    pub fn exclusions_for(&self, taxon: &str) -> Option<&BTreeSet<String>> {
        self.basionym_exclusions.get(taxon)
    }

    /// Number of worker threads after resolving the 0 = all cores default
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    pub fn validate(&self) -> Result<(), ChecklistError> {
        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(ChecklistError::Configuration(format!(
                "similarity_threshold must be within 0-100, got {}",
                self.similarity_threshold
            )));
        }
        if self.root_rank.is_species_or_below() {
            return Err(ChecklistError::Configuration(format!(
                "root_rank must be above species, got {:?}",
                self.root_rank
            )));
        }
        Ok(())
    }
}

pub fn default_config() -> ConsolidationConfig {
    ConsolidationConfig::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConsolidationConfig, ChecklistError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let config: ConsolidationConfig = toml::from_str(&contents)?;
    config.validate()?;
    debug!(
        "Loaded consolidation config from {}: root rank {:?}, threshold {}, {} excluded taxa",
        path.display(),
        config.root_rank,
        config.similarity_threshold,
        config.basionym_exclusions.len()
    );
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &ConsolidationConfig) -> Result<(), ChecklistError> {
    let path = path.as_ref();
    let contents = toml::to_string_pretty(config)
        .map_err(|e| ChecklistError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    debug!("Saved consolidation config to {}", path.display());
    Ok(())
}
