use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use super::stopwords::is_stop_word;

pub const DEFAULT_MAX_FEATURES: usize = 1000;

// Terms are runs of at least two word characters
static TERM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("hardcoded term regex is invalid"));

/// Splits lower-cased text into vocabulary candidate terms, stop words removed
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM_REGEX
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|term| !is_stop_word(term))
        .map(str::to_string)
        .collect()
}

/// Frozen TF-IDF weighting over the skill text of the training catalog
///
/// Fitted once at training time; `transform` only ever reads the learned
/// vocabulary and idf table, so unseen terms contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillVectorizer {
    /// term -> column index, columns assigned in alphabetical term order
    vocabulary: BTreeMap<String, usize>,
    /// idf weight per column
    idf: Vec<f64>,
}

impl SkillVectorizer {
    /// Learns the vocabulary and idf weights from one document per course
    ///
    /// When more than `max_features` distinct terms exist, the most frequent
    /// across the whole corpus are kept (ties broken alphabetically).
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let n_docs = documents.len();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = tokenize(doc.as_ref());
            let mut seen: HashSet<&str> = HashSet::new();
            for term in &terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.as_str()) {
                    *doc_freq.entry(term.clone()).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);

        let kept: BTreeSet<String> = ranked.into_iter().map(|(term, _)| term).collect();

        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (index, term) in kept.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0);
            idf.push(smoothed_idf(n_docs, df));
            vocabulary.insert(term, index);
        }

        Self { vocabulary, idf }
    }

    /// L2-normalized tf-idf row for `text`; empty or fully unseen text yields zeros
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.idf.len()];
        for term in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&term) {
                row[index] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in row.iter_mut() {
                *value /= norm;
            }
        }
        row
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(String::as_str)
    }
}

fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}
