use super::{bigrams, log_priors, unigrams, ClassTables, TieBreak};

use tracing::{debug, instrument};

/// Unigram and bigram Naive Bayes models combined per class as
/// `(1 - lambda) * unigram + lambda * bigram`.
#[derive(Debug, Clone)]
pub struct MixtureModel {
    unigram_tables: ClassTables,
    bigram_tables: ClassTables,
    bigram_lambda: f64,
    unigram_smoothing: f64,
    bigram_smoothing: f64,
    pos_prior: f64,
    tie_break: TieBreak,
}

impl MixtureModel {
    pub fn train<S: AsRef<str>>(
        train_set: &[Vec<S>],
        train_labels: &[u8],
        bigram_lambda: f64,
        unigram_smoothing: f64,
        bigram_smoothing: f64,
        pos_prior: f64,
    ) -> Self {
        MixtureModel {
            unigram_tables: ClassTables::train(train_set, train_labels, unigrams),
            bigram_tables: ClassTables::train(train_set, train_labels, bigrams),
            bigram_lambda,
            unigram_smoothing,
            bigram_smoothing,
            pos_prior,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    // The end weights are special-cased so that a class scoring -inf under
    // the unused model cannot turn the product into NaN.
    fn mix(&self, unigram: f64, bigram: f64) -> f64 {
        if self.bigram_lambda == 0.0 {
            unigram
        } else if self.bigram_lambda == 1.0 {
            bigram
        } else {
            (1.0 - self.bigram_lambda) * unigram + self.bigram_lambda * bigram
        }
    }

    /// Mixed `(positive, negative)` scores. Both halves include the log prior;
    /// a document shorter than two tokens has a bigram score of the prior
    /// alone.
    pub fn scores<S: AsRef<str>>(&self, document: &[S]) -> (f64, f64) {
        let (prior_positive, prior_negative) = log_priors(self.pos_prior);

        let (unigram_positive, unigram_negative) = self
            .unigram_tables
            .log_likelihoods(document, self.unigram_smoothing);
        let keys = bigrams(document);
        let (bigram_positive, bigram_negative) = self
            .bigram_tables
            .log_likelihoods(&keys[..], self.bigram_smoothing);

        (
            self.mix(
                prior_positive + unigram_positive,
                prior_positive + bigram_positive,
            ),
            self.mix(
                prior_negative + unigram_negative,
                prior_negative + bigram_negative,
            ),
        )
    }

    pub fn classify<S: AsRef<str>>(&self, document: &[S]) -> bool {
        let (positive, negative) = self.scores(document);
        self.tie_break.decide(positive, negative)
    }

    pub fn predict<S: AsRef<str>>(&self, dev_set: &[Vec<S>]) -> Vec<bool> {
        dev_set.iter().map(|document| self.classify(document)).collect()
    }
}

/// Unigram+bigram mixture counterpart of [`super::naive_bayes`].
#[instrument(skip_all, name = "naive_bayes_mixture", fields(train = train_set.len(), dev = dev_set.len(), lambda = bigram_lambda), level = "debug")]
pub fn naive_bayes_mixture<S: AsRef<str>, T: AsRef<str>>(
    train_set: &[Vec<S>],
    train_labels: &[u8],
    dev_set: &[Vec<T>],
    bigram_lambda: f64,
    unigram_smoothing_parameter: f64,
    bigram_smoothing_parameter: f64,
    pos_prior: f64,
) -> Vec<bool> {
    let model = MixtureModel::train(
        train_set,
        train_labels,
        bigram_lambda,
        unigram_smoothing_parameter,
        bigram_smoothing_parameter,
        pos_prior,
    );
    let predictions = model.predict(dev_set);
    debug!(
        "{} of {} predicted positive",
        predictions.iter().filter(|&&p| p).count(),
        predictions.len()
    );
    predictions
}
