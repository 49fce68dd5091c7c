use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path as FsPath;
use std::time::Instant;
use tracing::{info, warn};

use crate::algorithm::{search, Method};
use crate::classifier::{MixtureModel, UnigramModel};
use crate::common::{validate_path, Path};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::map::{Grid, Maze};
use crate::stat::{Metrics, Stats};

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub maze_path: String,
    pub method: Method,
    pub solved: bool,
    pub path: Path,
    pub stats: Stats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub corpus_path: String,
    pub mixture: bool,
    pub predictions: Vec<bool>,
    pub metrics: Option<Metrics>,
    pub time_us: usize,
}

pub fn run_search(config: &Config, maze_path: &str) -> Result<SearchReport> {
    let maze = Maze::from_file(maze_path)?;
    info!(
        "Loaded maze {maze_path}: {}x{}, {} waypoints",
        maze.height,
        maze.width,
        maze.waypoints().len()
    );

    let mut stats = Stats::default();
    let path = search(
        config.search.method,
        &maze,
        config.search.mst_scaling,
        &mut stats,
    );
    stats.print();

    let solved = !path.is_empty();
    if solved {
        // Single-target methods only aim for the first waypoint.
        let target = match config.search.method {
            Method::Bfs | Method::Astar => maze.with_waypoints(maze.waypoints()[..1].to_vec()),
            Method::AstarCorner | Method::AstarMultiple => maze.clone(),
        };
        validate_path(&target, &path).context("search returned an invalid path")?;
    } else {
        warn!("no path found");
    }

    Ok(SearchReport {
        maze_path: maze_path.to_string(),
        method: config.search.method,
        solved,
        path,
        stats,
    })
}

pub fn run_classify(config: &Config, corpus_path: &str) -> Result<ClassifyReport> {
    let dataset = Corpus::load_from_yaml(corpus_path)?.tokenize();
    let classifier = &config.classifier;

    let start_time = Instant::now();
    let predictions = if classifier.mixture {
        MixtureModel::train(
            &dataset.train_set,
            &dataset.train_labels,
            classifier.bigram_lambda,
            classifier.smoothing,
            classifier.bigram_smoothing,
            classifier.pos_prior,
        )
        .with_tie_break(classifier.tie_break)
        .predict(&dataset.dev_set)
    } else {
        UnigramModel::train(
            &dataset.train_set,
            &dataset.train_labels,
            classifier.smoothing,
            classifier.pos_prior,
        )
        .with_tie_break(classifier.tie_break)
        .predict(&dataset.dev_set)
    };
    let time_us = start_time.elapsed().as_micros() as usize;

    let metrics = dataset
        .dev_labels
        .as_ref()
        .map(|expected| Metrics::from_predictions(&predictions, expected));
    match &metrics {
        Some(metrics) => metrics.print(),
        None => info!("dev set is unlabeled, skipping metrics"),
    }

    Ok(ClassifyReport {
        corpus_path: corpus_path.to_string(),
        mixture: classifier.mixture,
        predictions,
        metrics,
        time_us,
    })
}

pub fn write_report<T: Serialize>(path: &str, report: &T) -> Result<()> {
    if let Some(parent) = FsPath::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("failed to create report {path}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Report written to {path}");
    Ok(())
}
