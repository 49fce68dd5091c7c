use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub path_length: usize,
    pub time_us: usize,
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub mst_computations: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Path length {:?} Time(microseconds) {:?} Expanded nodes {:?} Generated nodes {:?} MST computations {:?}",
            self.path_length,
            self.time_us,
            self.expanded_nodes,
            self.generated_nodes,
            self.mst_computations
        );
    }
}

/// Binary classification quality, with label `true` as the positive class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl Metrics {
    pub fn from_predictions(predicted: &[bool], expected: &[bool]) -> Self {
        let mut metrics = Metrics::default();
        for (&p, &e) in predicted.iter().zip(expected) {
            match (p, e) {
                (true, true) => metrics.true_positive += 1,
                (true, false) => metrics.false_positive += 1,
                (false, false) => metrics.true_negative += 1,
                (false, true) => metrics.false_negative += 1,
            }
        }
        metrics
    }

    fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    pub fn print(&self) {
        info!(
            "Accuracy {:.4} F1 {:.4} Precision {:.4} Recall {:.4}",
            self.accuracy(),
            self.f1(),
            self.precision(),
            self.recall()
        );
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let predicted = [true, true, false, false, true];
        let expected = [true, false, false, true, true];
        let metrics = Metrics::from_predictions(&predicted, &expected);

        assert_eq!(metrics.true_positive, 2);
        assert_eq!(metrics.false_positive, 1);
        assert_eq!(metrics.true_negative, 1);
        assert_eq!(metrics.false_negative, 1);
        assert!((metrics.accuracy() - 0.6).abs() < 1e-9);
        assert!((metrics.precision() - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.recall() - 2.0 / 3.0).abs() < 1e-9);
        assert!((metrics.f1() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_without_positives() {
        let metrics = Metrics::from_predictions(&[false, false], &[false, false]);
        assert_eq!(metrics.accuracy(), 1.0);
        assert_eq!(metrics.precision(), 0.0);
        assert_eq!(metrics.f1(), 0.0);
    }
}
