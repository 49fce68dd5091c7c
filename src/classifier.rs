mod mixture;
mod unigram;

pub use mixture::{naive_bayes_mixture, MixtureModel};
pub use unigram::{naive_bayes, UnigramModel};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Training label of the positive class; every other label is negative.
pub const POSITIVE_LABEL: u8 = 1;

/// Which class wins when both log scores are exactly equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    Positive,
    Negative,
}

impl TieBreak {
    pub fn decide(self, positive: f64, negative: f64) -> bool {
        match self {
            TieBreak::Positive => positive >= negative,
            TieBreak::Negative => positive > negative,
        }
    }
}

/// Occurrence counts of one class.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrequencyTable {
    counts: HashMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    fn add(&mut self, key: String) {
        *self.counts.entry(key).or_default() += 1;
        self.total += 1;
    }

    pub(crate) fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn vocabulary_size(&self) -> usize {
        self.counts.len()
    }

    /// Laplace-smoothed `ln P(key | class)`. A class that saw nothing in
    /// training gives every key probability zero.
    pub(crate) fn log_likelihood(&self, key: &str, smoothing: f64) -> f64 {
        if self.total == 0 {
            return f64::NEG_INFINITY;
        }
        let numerator = self.count(key) as f64 + smoothing;
        let denominator = self.total as f64 + smoothing * self.vocabulary_size() as f64;
        (numerator / denominator).ln()
    }
}

/// Per-class frequency tables over one kind of feature.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClassTables {
    pub(crate) positive: FrequencyTable,
    pub(crate) negative: FrequencyTable,
}

impl ClassTables {
    pub(crate) fn train<S: AsRef<str>>(
        train_set: &[Vec<S>],
        train_labels: &[u8],
        features: fn(&[S]) -> Vec<String>,
    ) -> Self {
        if train_set.len() != train_labels.len() {
            warn!(
                "{} training documents but {} labels, extra entries are ignored",
                train_set.len(),
                train_labels.len()
            );
        }

        let mut tables = ClassTables::default();
        for (document, &label) in train_set.iter().zip(train_labels) {
            let table = if label == POSITIVE_LABEL {
                &mut tables.positive
            } else {
                &mut tables.negative
            };
            for key in features(document) {
                table.add(key);
            }
        }

        debug!(
            "positive: {} keys / {} total, negative: {} keys / {} total",
            tables.positive.vocabulary_size(),
            tables.positive.total,
            tables.negative.vocabulary_size(),
            tables.negative.total
        );
        tables
    }

    /// Summed log likelihoods of `keys` as `(positive, negative)`.
    pub(crate) fn log_likelihoods<K: AsRef<str>>(&self, keys: &[K], smoothing: f64) -> (f64, f64) {
        keys.iter().fold((0.0, 0.0), |(positive, negative), key| {
            (
                positive + self.positive.log_likelihood(key.as_ref(), smoothing),
                negative + self.negative.log_likelihood(key.as_ref(), smoothing),
            )
        })
    }
}

/// `(ln P(positive), ln P(negative))`.
pub(crate) fn log_priors(pos_prior: f64) -> (f64, f64) {
    (pos_prior.ln(), (1.0 - pos_prior).ln())
}

pub(crate) fn unigrams<S: AsRef<str>>(document: &[S]) -> Vec<String> {
    document.iter().map(|token| token.as_ref().to_owned()).collect()
}

/// Adjacent token pairs joined by a single space.
pub(crate) fn bigrams<S: AsRef<str>>(document: &[S]) -> Vec<String> {
    document
        .windows(2)
        .map(|pair| format!("{} {}", pair[0].as_ref(), pair[1].as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tie_break() {
        assert!(TieBreak::Positive.decide(-1.0, -1.0));
        assert!(!TieBreak::Negative.decide(-1.0, -1.0));
        assert!(TieBreak::Negative.decide(-0.5, -1.0));
        assert!(!TieBreak::Positive.decide(-2.0, -1.0));
    }

    #[test]
    fn test_frequency_table() {
        let tables = ClassTables::train(
            &[vec!["a", "a", "b"], vec!["c"]],
            &[1, 0],
            unigrams,
        );
        assert_eq!(tables.positive.count("a"), 2);
        assert_eq!(tables.positive.count("c"), 0);
        assert_eq!(tables.positive.vocabulary_size(), 2);
        assert_eq!(tables.negative.count("c"), 1);

        // (2 + 1) / (3 + 1 * 2)
        assert!((tables.positive.log_likelihood("a", 1.0) - 0.6f64.ln()).abs() < 1e-12);
        // Unseen: 1 / (3 + 2)
        assert!((tables.positive.log_likelihood("z", 1.0) - 0.2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_class_has_zero_probability() {
        let tables = ClassTables::train(&[vec!["a"]], &[1], unigrams);
        assert_eq!(tables.negative.log_likelihood("a", 1.0), f64::NEG_INFINITY);
        let (positive, negative) = tables.log_likelihoods::<&str>(&[], 1.0);
        assert_eq!((positive, negative), (0.0, 0.0));
    }

    #[test]
    fn test_bigrams() {
        assert_eq!(bigrams(&["a", "b", "c"]), vec!["a b", "b c"]);
        assert!(bigrams(&["a"]).is_empty());
        assert!(bigrams::<&str>(&[]).is_empty());
    }
}
