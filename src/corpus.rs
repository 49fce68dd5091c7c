use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use tracing::info;

use crate::classifier::POSITIVE_LABEL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRecord {
    pub label: u8,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevRecord {
    #[serde(default)]
    pub label: Option<u8>,
    pub text: String,
}

/// Labeled training documents plus development documents, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub train: Vec<TrainRecord>,
    #[serde(default)]
    pub dev: Vec<DevRecord>,
}

/// Tokenized corpus ready for the classifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub train_set: Vec<Vec<String>>,
    pub train_labels: Vec<u8>,
    pub dev_set: Vec<Vec<String>>,
    /// Gold dev labels as booleans, present only if every dev record has one.
    pub dev_labels: Option<Vec<bool>>,
}

impl Corpus {
    pub fn load_from_yaml(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open corpus {path}"))?;
        let reader = BufReader::new(file);
        let corpus: Corpus = serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse corpus {path}"))?;
        corpus.validate()?;
        info!(
            "Loaded corpus {path}: {} training and {} dev documents",
            corpus.train.len(),
            corpus.dev.len()
        );
        Ok(corpus)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let corpus: Corpus = serde_yaml::from_str(content)?;
        corpus.validate()?;
        Ok(corpus)
    }

    fn validate(&self) -> Result<()> {
        for (index, record) in self.train.iter().enumerate() {
            if record.label > 1 {
                bail!("training record {index} has label {}, expected 0 or 1", record.label);
            }
        }
        for (index, record) in self.dev.iter().enumerate() {
            if let Some(label) = record.label.filter(|&label| label > 1) {
                bail!("dev record {index} has label {label}, expected 0 or 1");
            }
        }
        Ok(())
    }

    pub fn tokenize(&self) -> Dataset {
        let dev_labels = self
            .dev
            .iter()
            .map(|record| record.label.map(|label| label == POSITIVE_LABEL))
            .collect::<Option<Vec<bool>>>();

        Dataset {
            train_set: self.train.iter().map(|record| tokenize(&record.text)).collect(),
            train_labels: self.train.iter().map(|record| record.label).collect(),
            dev_set: self.dev.iter().map(|record| tokenize(&record.text)).collect(),
            dev_labels: dev_labels.filter(|labels| !labels.is_empty()),
        }
    }
}

/// Lowercases `text` and splits it into words of letters, digits and inner
/// apostrophes.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|word| word.trim_matches('\''))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
