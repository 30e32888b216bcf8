use crate::fold::fold_to_ascii;

/// Normalized similarity of two name strings, 0 meaning unrelated and 100 identical
pub trait StringSimilarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Jaro-Winkler similarity over lower-cased, ASCII-folded names
#[derive(Debug, Clone, Copy, Default)]
pub struct ScientificNameSimilarity;

impl ScientificNameSimilarity {
    pub fn new() -> Self {
        Self
    }

    fn prepare(x: &str) -> String {
        fold_to_ascii(x)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl StringSimilarity for ScientificNameSimilarity {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a = Self::prepare(a);
        let b = Self::prepare(b);
        strsim::jaro_winkler(&a, &b) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        let sim = ScientificNameSimilarity;
        assert!((sim.similarity("Abies alba", "Abies alba") - 100.0).abs() < f64::EPSILON);
        assert!((sim.similarity("Abies  alba", "abies alba") - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_orthographic_variants_are_close() {
        let sim = ScientificNameSimilarity;
        assert!(sim.similarity("Abies rupestre", "Abies rupestris") >= 92.0);
        assert!(sim.similarity("Poa pratensis", "Poa pratense") >= 92.0);
    }

    #[test]
    fn test_unrelated_names_are_far() {
        let sim = ScientificNameSimilarity;
        assert!(sim.similarity("Abies alba", "Quercus robur") < 70.0);
    }
}
