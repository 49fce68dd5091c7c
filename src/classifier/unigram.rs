use super::{log_priors, unigrams, ClassTables, TieBreak};

use tracing::{debug, instrument};

/// Bag-of-words Naive Bayes over single tokens.
#[derive(Debug, Clone)]
pub struct UnigramModel {
    tables: ClassTables,
    smoothing: f64,
    pos_prior: f64,
    tie_break: TieBreak,
}

impl UnigramModel {
    pub fn train<S: AsRef<str>>(
        train_set: &[Vec<S>],
        train_labels: &[u8],
        smoothing: f64,
        pos_prior: f64,
    ) -> Self {
        UnigramModel {
            tables: ClassTables::train(train_set, train_labels, unigrams),
            smoothing,
            pos_prior,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// `(positive, negative)` log posterior scores, up to a shared constant.
    pub fn scores<S: AsRef<str>>(&self, document: &[S]) -> (f64, f64) {
        let (prior_positive, prior_negative) = log_priors(self.pos_prior);
        let (positive, negative) = self.tables.log_likelihoods(document, self.smoothing);
        (prior_positive + positive, prior_negative + negative)
    }

    pub fn classify<S: AsRef<str>>(&self, document: &[S]) -> bool {
        let (positive, negative) = self.scores(document);
        self.tie_break.decide(positive, negative)
    }

    pub fn predict<S: AsRef<str>>(&self, dev_set: &[Vec<S>]) -> Vec<bool> {
        dev_set.iter().map(|document| self.classify(document)).collect()
    }
}

/// Trains on `train_set` and labels each document of `dev_set`, `true` for
/// the positive class. Exact ties go to the positive class.
#[instrument(skip_all, name = "naive_bayes", fields(train = train_set.len(), dev = dev_set.len()), level = "debug")]
pub fn naive_bayes<S: AsRef<str>, T: AsRef<str>>(
    train_set: &[Vec<S>],
    train_labels: &[u8],
    dev_set: &[Vec<T>],
    smoothing_parameter: f64,
    pos_prior: f64,
) -> Vec<bool> {
    let model = UnigramModel::train(train_set, train_labels, smoothing_parameter, pos_prior);
    let predictions = model.predict(dev_set);
    debug!(
        "{} of {} predicted positive",
        predictions.iter().filter(|&&p| p).count(),
        predictions.len()
    );
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spam_word_predicts_negative() {
        let train = vec![vec!["free", "money"], vec!["hello", "friend"]];
        let predictions = naive_bayes(&train, &[0, 1], &[vec!["free"]], 1.0, 0.5);
        assert_eq!(predictions, vec![false]);
    }

    #[test]
    fn test_single_class_round_trip() {
        let train = vec![vec!["a", "b"]];
        assert_eq!(naive_bayes(&train, &[0], &train, 1.0, 0.5), vec![false]);
        assert_eq!(naive_bayes(&train, &[1], &train, 1.0, 0.5), vec![true]);
    }

    #[test]
    fn test_scores_match_formula() {
        let model = UnigramModel::train(&[vec!["a", "a", "b"], vec!["b"]], &[1, 0], 1.0, 0.5);
        let (positive, negative) = model.scores(&["a"]);
        // (2 + 1) / (3 + 2) against (0 + 1) / (1 + 1).
        assert!((positive - (0.5f64.ln() + 0.6f64.ln())).abs() < 1e-12);
        assert!((negative - (0.5f64.ln() + 0.5f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_token_uses_class_vocabulary() {
        let train = vec![vec!["a", "b", "c"], vec!["d"]];
        // 1 / (3 + 3) for positive, 1 / (1 + 1) for negative.
        assert_eq!(naive_bayes(&train, &[1, 0], &[vec!["z"]], 1.0, 0.5), vec![false]);
    }

    #[test]
    fn test_prior_decides_empty_document() {
        let train = vec![vec!["a"], vec!["b"]];
        let dev: Vec<Vec<&str>> = vec![vec![]];
        assert_eq!(naive_bayes(&train, &[1, 0], &dev, 1.0, 0.7), vec![true]);
        assert_eq!(naive_bayes(&train, &[1, 0], &dev, 1.0, 0.3), vec![false]);
    }

    #[test]
    fn test_tie_policy() {
        let model = UnigramModel::train(&[vec!["a"], vec!["a"]], &[1, 0], 1.0, 0.5);
        assert!(model.classify(&["a"]));
        let model = model.with_tie_break(TieBreak::Negative);
        assert!(!model.classify(&["a"]));
    }

    #[test]
    fn test_predict_many() {
        let train = vec![
            vec!["great", "movie", "loved", "it"],
            vec!["loved", "the", "acting"],
            vec!["terrible", "movie", "hated", "it"],
            vec!["boring", "and", "terrible"],
        ];
        let dev = vec![
            vec!["loved", "it"],
            vec!["terrible", "acting"],
            vec!["hated", "boring"],
        ];
        let predictions = naive_bayes(&train, &[1, 1, 0, 0], &dev, 1.0, 0.5);
        assert_eq!(predictions, vec![true, false, false]);
    }
}
