/// Integration tests for authorship comparison and name normalization
use checklist_core::{Authorship, NomCode};
use checklist_names::{
    AuthorComparator, EpithetNormalizer, SciNameNormalizer, ScientificNameSimilarity,
    StandardAuthorComparator, StringSimilarity,
};
use proptest::prelude::*;

fn auth(authors: &[&str]) -> Authorship {
    Authorship::new(authors.iter().copied())
}

#[test]
fn test_strict_author_pairs() {
    let comp = StandardAuthorComparator::default();
    let cases = [
        (vec!["L."], vec!["L."], true),
        (vec!["Mill."], vec!["Mill."], true),
        (vec!["DC."], vec!["DC."], true),
        (vec!["A.Gray"], vec!["Gray"], true),
        (vec!["Torr.", "A.Gray"], vec!["A.Gray"], true),
        (vec!["Brouillet", "Urbatsch", "R.P.Roberts"], vec!["R.P.Roberts"], true),
        (vec!["L."], vec!["Mill."], false),
        (vec!["Desf."], vec!["F.Dietr."], false),
        (vec!["Hook."], vec!["Hook.f."], false),
    ];
    for (a1, a2, expected) in cases {
        assert_eq!(
            comp.compare_strict(&auth(&a1), &auth(&a2), Some(NomCode::Botanical), 2),
            expected,
            "{:?} vs {:?}",
            a1,
            a2
        );
    }
}

#[test]
fn test_epithet_buckets() {
    let norm = SciNameNormalizer::new();
    assert_eq!(norm.normalize_epithet("albus"), norm.normalize_epithet("alba"));
    assert_eq!(norm.normalize_epithet("Alba"), norm.normalize_epithet("album"));
    assert_ne!(norm.normalize_epithet("alba"), norm.normalize_epithet("nigra"));
}

proptest! {
    #[test]
    fn similarity_is_bounded(a in "[A-Za-z ]{0,30}", b in "[A-Za-z ]{0,30}") {
        let sim = ScientificNameSimilarity::new().similarity(&a, &b);
        prop_assert!(sim >= 0.0);
        prop_assert!(sim <= 100.0 + 1e-9);
    }

    #[test]
    fn identical_names_are_fully_similar(a in "[A-Z][a-z]{2,12} [a-z]{3,15}") {
        let sim = ScientificNameSimilarity::new().similarity(&a, &a);
        prop_assert!((sim - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_epithets_are_lowercase_letters(e in "\\PC{0,20}") {
        let x = SciNameNormalizer::new().normalize_epithet(&e);
        prop_assert!(x.chars().all(|c| c.is_ascii_lowercase() || !c.is_ascii()));
    }

    #[test]
    fn strict_comparison_of_same_team_holds(surname in "[A-Z][a-z]{3,10}", year in 1753u32..2024) {
        let a = Authorship::new([surname.clone()]).with_year(year.to_string());
        prop_assert!(StandardAuthorComparator::default().compare_strict(&a, &a.clone(), None, 0));
    }
}
