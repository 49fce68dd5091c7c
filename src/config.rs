use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::algorithm::{Method, MstScaling};
use crate::classifier::TieBreak;

#[derive(Parser, Debug)]
#[command(
    name = "Maze Bayes",
    about = "Grid maze search and Naive Bayes text classification.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the JSON report file")]
    pub output_path: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a maze for a path through its waypoints.
    Search {
        #[arg(long, help = "Path to the maze file")]
        maze_path: String,

        #[arg(long, value_enum, help = "Search method")]
        method: Option<Method>,

        #[arg(
            long,
            help = "Damp the MST heuristic (divide by 1.5 above 100)",
            default_value_t = false
        )]
        legacy_mst: bool,
    },
    /// Train on a labeled corpus and classify its dev documents.
    Classify {
        #[arg(long, help = "Path to the YAML corpus file")]
        corpus_path: String,

        #[arg(long, help = "Use the unigram+bigram mixture model", default_value_t = false)]
        mixture: bool,

        #[arg(long, help = "Laplace smoothing for unigrams")]
        smoothing: Option<f64>,

        #[arg(long, help = "Laplace smoothing for bigrams")]
        bigram_smoothing: Option<f64>,

        #[arg(long, help = "Weight of the bigram model in the mixture")]
        bigram_lambda: Option<f64>,

        #[arg(long, help = "Prior probability of the positive class")]
        pos_prior: Option<f64>,

        #[arg(long, value_enum, help = "Class chosen on an exact score tie")]
        tie_break: Option<TieBreak>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub method: Method,
    pub mst_scaling: MstScaling,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            method: Method::AstarMultiple,
            mst_scaling: MstScaling::Exact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub mixture: bool,
    pub smoothing: f64,
    pub bigram_smoothing: f64,
    pub bigram_lambda: f64,
    pub pos_prior: f64,
    pub tie_break: TieBreak,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            mixture: false,
            smoothing: 1.0,
            bigram_smoothing: 1.0,
            bigram_lambda: 0.5,
            pos_prior: 0.5,
            tie_break: TieBreak::Positive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_path: String,
    pub search: SearchConfig,
    pub classifier: ClassifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_path: "result/result.json".to_string(),
            search: SearchConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> Result<Self> {
        if let Some(output_path) = &cli.output_path {
            self.output_path = output_path.clone();
        }

        match &cli.command {
            Command::Search {
                method, legacy_mst, ..
            } => {
                if let Some(method) = method {
                    self.search.method = *method;
                }
                if *legacy_mst {
                    self.search.mst_scaling = MstScaling::LEGACY;
                }
            }
            Command::Classify {
                mixture,
                smoothing,
                bigram_smoothing,
                bigram_lambda,
                pos_prior,
                tie_break,
                ..
            } => {
                let classifier = &mut self.classifier;
                classifier.mixture |= *mixture;
                classifier.smoothing = smoothing.unwrap_or(classifier.smoothing);
                classifier.bigram_smoothing =
                    bigram_smoothing.unwrap_or(classifier.bigram_smoothing);
                classifier.bigram_lambda = bigram_lambda.unwrap_or(classifier.bigram_lambda);
                classifier.pos_prior = pos_prior.unwrap_or(classifier.pos_prior);
                classifier.tie_break = tie_break.unwrap_or(classifier.tie_break);
            }
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if let MstScaling::Damped { divisor, .. } = self.search.mst_scaling {
            if divisor <= 0.0 {
                bail!("MST damping divisor must be positive, got {divisor}");
            }
        }

        let classifier = &self.classifier;
        if classifier.smoothing <= 0.0 {
            bail!(
                "Smoothing parameter must be greater than 0, got {}",
                classifier.smoothing
            );
        }
        if classifier.bigram_smoothing <= 0.0 {
            bail!(
                "Bigram smoothing parameter must be greater than 0, got {}",
                classifier.bigram_smoothing
            );
        }
        if !(0.0..=1.0).contains(&classifier.bigram_lambda) {
            bail!(
                "Bigram lambda must be within [0, 1], got {}",
                classifier.bigram_lambda
            );
        }
        if classifier.pos_prior <= 0.0 || classifier.pos_prior >= 1.0 {
            bail!(
                "Positive prior must be within (0, 1), got {}",
                classifier.pos_prior
            );
        }
        Ok(())
    }
}
