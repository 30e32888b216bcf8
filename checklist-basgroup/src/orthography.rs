//! Detection of epithets that are misspellings of each other
//!
//! Runs before basionym grouping. Elements of different epithet buckets with
//! strictly equal authorship and highly similar names are clustered and moved
//! into a single bucket so the sorter sees them together.
use crate::union_find::UnionFind;
use checklist_core::NomCode;
use checklist_names::{AuthorComparator, FormattableName, StringSimilarity};
use std::collections::BTreeMap;
use tracing::debug;

pub struct OrthographicVariantClusterer<'a> {
    comparator: &'a dyn AuthorComparator,
    similarity: &'a dyn StringSimilarity,
    threshold: f64,
    year_tolerance: u32,
}

impl<'a> OrthographicVariantClusterer<'a> {
    pub fn new(
        comparator: &'a dyn AuthorComparator,
        similarity: &'a dyn StringSimilarity,
        threshold: f64,
    ) -> Self {
        Self {
            comparator,
            similarity,
            threshold,
            year_tolerance: 2,
        }
    }

    pub fn with_year_tolerance(mut self, year_tolerance: u32) -> Self {
        self.year_tolerance = year_tolerance;
        self
    }

    /// Merge variant epithet buckets in place and return the number of moved elements.
    ///
    /// Only buckets sharing the first character and differing in length by at
    /// most one are compared. Clustering is single-link: any pair reaching the
    /// threshold joins the same cluster. All members of a cluster end up in
    /// the bucket with the smallest epithet key of that cluster. Emptied
    /// buckets are removed.
    pub fn cluster<T, R>(
        &self,
        code: Option<NomCode>,
        buckets: &mut BTreeMap<String, Vec<T>>,
        resolver: R,
    ) -> usize
    where
        R: Fn(&T) -> &dyn FormattableName,
    {
        let keys: Vec<String> = buckets.keys().cloned().collect();
        let mut offsets = Vec::with_capacity(keys.len());
        let mut locations = Vec::new();
        for (k, key) in keys.iter().enumerate() {
            offsets.push(locations.len());
            let size = buckets.get(key).map(Vec::len).unwrap_or(0);
            locations.extend((0..size).map(|i| (k, i)));
        }

        let mut index: BTreeMap<(char, usize), Vec<usize>> = BTreeMap::new();
        for (k, key) in keys.iter().enumerate() {
            if let Some(first) = key.chars().next() {
                index.entry((first, key.chars().count())).or_default().push(k);
            }
        }

        let mut uf = UnionFind::new(locations.len());
        let mut max_similarity = 0.0_f64;
        for (&(first, len), same_len) in &index {
            let longer = index.get(&(first, len + 1));
            for (pos, &ka) in same_len.iter().enumerate() {
                let window = same_len[pos + 1..]
                    .iter()
                    .chain(longer.into_iter().flatten());
                for &kb in window {
                    let (Some(a), Some(b)) = (buckets.get(&keys[ka]), buckets.get(&keys[kb])) else {
                        continue;
                    };
                    for (ia, ea) in a.iter().enumerate() {
                        let na = resolver(ea);
                        for (ib, eb) in b.iter().enumerate() {
                            let nb = resolver(eb);
                            if !self.comparator.compare_strict(
                                na.basionym_or_combination_authorship(),
                                nb.basionym_or_combination_authorship(),
                                code,
                                self.year_tolerance,
                            ) {
                                continue;
                            }
                            let sim = self
                                .similarity
                                .similarity(na.scientific_name(), nb.scientific_name());
                            max_similarity = max_similarity.max(sim);
                            if sim >= self.threshold {
                                uf.union(offsets[ka] + ia, offsets[kb] + ib);
                            }
                        }
                    }
                }
            }
        }

        // (from bucket, element index, to bucket)
        let mut moves: Vec<(usize, usize, usize)> = Vec::new();
        for members in uf.sets().into_values() {
            if members.len() < 2 {
                continue;
            }
            let target = members.iter().map(|&m| locations[m].0).min().unwrap_or(0);
            for &m in &members {
                let (k, i) = locations[m];
                if k != target {
                    debug!("Move orthographic variant {} into epithet {}", keys[k], keys[target]);
                    moves.push((k, i, target));
                }
            }
        }
        if moves.is_empty() {
            return 0;
        }

        // remove back to front so indices stay valid, then append
        moves.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        let mut moved: Vec<(usize, T)> = Vec::with_capacity(moves.len());
        for &(k, i, target) in &moves {
            if let Some(bucket) = buckets.get_mut(&keys[k]) {
                moved.push((target, bucket.remove(i)));
            }
        }
        let count = moved.len();
        for (target, element) in moved.into_iter().rev() {
            buckets.entry(keys[target].clone()).or_default().push(element);
        }
        buckets.retain(|_, v| !v.is_empty());
        debug!(
            "Moved {} orthographic variants, max similarity {:.1}",
            count, max_similarity
        );
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checklist_core::{Authorship, LinneanNameUsage, Rank};
    use checklist_names::StandardAuthorComparator;
    use pretty_assertions::assert_eq;

    struct FixedSimilarity(f64);

    impl StringSimilarity for FixedSimilarity {
        fn similarity(&self, _a: &str, _b: &str) -> f64 {
            self.0
        }
    }

    fn as_name(u: &LinneanNameUsage) -> &dyn FormattableName {
        u
    }

    fn usage(id: &str, epithet: &str, author: &str) -> LinneanNameUsage {
        LinneanNameUsage {
            id: id.to_string(),
            scientific_name: format!("Abies {}", epithet),
            authorship: Some(author.to_string()),
            rank: Rank::Species,
            genus: Some("Abies".to_string()),
            specific_epithet: Some(epithet.to_string()),
            combination_authorship: Authorship::new([author]),
            ..Default::default()
        }
    }

    fn buckets(names: Vec<LinneanNameUsage>) -> BTreeMap<String, Vec<LinneanNameUsage>> {
        let mut map: BTreeMap<String, Vec<LinneanNameUsage>> = BTreeMap::new();
        for u in names {
            let key = u.specific_epithet.clone().unwrap_or_default();
            map.entry(key).or_default().push(u);
        }
        map
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let comp = StandardAuthorComparator::default();
        let names = vec![usage("1", "rupestre", "L."), usage("2", "rupestris", "L.")];

        let sim = FixedSimilarity(92.0);
        let mut map = buckets(names.clone());
        let moved = OrthographicVariantClusterer::new(&comp, &sim, 92.0).cluster(None, &mut map, as_name);
        assert_eq!(moved, 1);
        assert_eq!(map.len(), 1);
        assert_eq!(map["rupestre"].len(), 2);

        let sim = FixedSimilarity(91.0);
        let mut map = buckets(names);
        let moved = OrthographicVariantClusterer::new(&comp, &sim, 92.0).cluster(None, &mut map, as_name);
        assert_eq!(moved, 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_authorship_must_match() {
        let comp = StandardAuthorComparator::default();
        let sim = FixedSimilarity(100.0);
        let mut map = buckets(vec![usage("1", "elatior", "L."), usage("2", "elattior", "Mill.")]);
        let moved = OrthographicVariantClusterer::new(&comp, &sim, 92.0).cluster(None, &mut map, as_name);
        assert_eq!(moved, 0);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_window_limits_length_difference() {
        let comp = StandardAuthorComparator::default();
        let sim = FixedSimilarity(100.0);
        let mut map = buckets(vec![
            usage("1", "alba", "L."),
            usage("2", "albida", "L."),
            usage("3", "nalba", "L."),
        ]);
        let moved = OrthographicVariantClusterer::new(&comp, &sim, 92.0).cluster(None, &mut map, as_name);
        assert_eq!(moved, 0);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_transitive_clusters() {
        let comp = StandardAuthorComparator::default();
        let sim = FixedSimilarity(95.0);
        let mut map = buckets(vec![
            usage("1", "elatior", "L."),
            usage("2", "elattior", "L."),
            usage("3", "elattiorr", "L."),
            usage("4", "elatior", "Mill."),
        ]);
        let moved = OrthographicVariantClusterer::new(&comp, &sim, 92.0).cluster(None, &mut map, as_name);
        assert_eq!(moved, 2);
        assert_eq!(map.len(), 1);
        let ids: Vec<&str> = map["elatior"].iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4", "2", "3"]);
    }

    #[test]
    fn test_real_similarity() {
        let comp = StandardAuthorComparator::default();
        let sim = checklist_names::ScientificNameSimilarity;
        let mut map = buckets(vec![usage("1", "rupestre", "L."), usage("2", "rupestris", "L.")]);
        let moved = OrthographicVariantClusterer::new(&comp, &sim, 92.0).cluster(None, &mut map, as_name);
        assert_eq!(moved, 1);
    }
}
