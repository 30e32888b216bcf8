//! Epithet normalization used to bucket names that share an epithet

use crate::fold::fold_to_ascii;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_LETTERS: Regex = Regex::new(r"[^a-z]+").unwrap();
    static ref DOUBLE_I: Regex = Regex::new(r"ii$").unwrap();
    static ref GENDER_ENDING: Regex = Regex::new(r"(?:us|um|on|a)$").unwrap();
}

/// Reduces an epithet to the key used for bucketing
pub trait EpithetNormalizer: Send + Sync {
    fn normalize_epithet(&self, epithet: &str) -> String;
}

/// Default normalizer unifying diacritics, case and Latin gender endings
#[derive(Debug, Clone, Copy, Default)]
pub struct SciNameNormalizer;

impl SciNameNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl EpithetNormalizer for SciNameNormalizer {
    fn normalize_epithet(&self, epithet: &str) -> String {
        let folded = fold_to_ascii(epithet).to_lowercase();
        let letters = NON_LETTERS.replace_all(&folded, "");
        let x = DOUBLE_I.replace(&letters, "i");
        if x.len() > 3 {
            GENDER_ENDING.replace(&x, "a").into_owned()
        } else {
            x.into_owned()
        }
    }
}
