//! Batch transformation of a directory of images.
//!
//! Walks an input directory, transforms every decodable image with the same
//! [`TransformRequest`], and writes the results as PNG under an output
//! directory, mirroring relative paths:
//!
//! ```text
//! input/                      output/
//! ├── portraits/              ├── portraits/
//! │   └── 001-anna.jpg   →    │   └── 001-anna.png
//! └── street.webp        →    └── street.png
//! ```
//!
//! ## Parallel Processing
//!
//! Files are processed in parallel using [rayon](https://docs.rs/rayon) on the
//! global pool, which the binary sizes from
//! [`effective_threads`](crate::config::effective_threads). Decode and encode
//! are the expensive parts; the transform itself is bounded by image area.
//!
//! ## Progress
//!
//! Each finished file is reported as a [`ProcessEvent`] over an optional
//! `mpsc` sender so a printer thread can stream output while workers run.
//! A failed file is reported and recorded; it does not stop the batch.

use crate::imaging::operations::{OperationError, TransformJob, transform_file};
use crate::imaging::rust_backend::is_supported_input;
use crate::imaging::{ImageBackend, RustBackend, TransformRequest};
use crate::resolution::Resolution;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Progress event emitted once per processed file.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Started {
        total: usize,
    },
    Transformed {
        index: usize,
        source: String,
        output: String,
        source_size: Resolution,
        output_size: Resolution,
    },
    Failed {
        index: usize,
        source: String,
        error: String,
    },
}

/// Per-file outcome in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub source: PathBuf,
    pub output: PathBuf,
    pub result: Result<Resolution, String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} transformed, {} failed", self.succeeded(), self.failed())
    }
}

/// Find every decodable image under `input_dir`, sorted by path.
pub fn discover_images(input_dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    if !input_dir.is_dir() {
        return Err(ProcessError::SourceNotFound(input_dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_supported_input(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Output path for `source`: same relative location, `.png` extension.
pub fn output_path_for(source: &Path, input_dir: &Path, output_dir: &Path) -> PathBuf {
    let relative = source.strip_prefix(input_dir).unwrap_or(source);
    output_dir.join(relative).with_extension("png")
}

pub fn process_dir(
    input_dir: &Path,
    output_dir: &Path,
    request: &TransformRequest,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, input_dir, output_dir, request, events)
}

/// Process a directory using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    input_dir: &Path,
    output_dir: &Path,
    request: &TransformRequest,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    let files = discover_images(input_dir)?;
    std::fs::create_dir_all(output_dir)?;
    info!(count = files.len(), input = %input_dir.display(), "starting batch");
    process_files(backend, &files, input_dir, output_dir, request, events)
}

/// Transform an explicit list of files in parallel.
pub fn process_files(
    backend: &impl ImageBackend,
    files: &[PathBuf],
    input_dir: &Path,
    output_dir: &Path,
    request: &TransformRequest,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    if let Some(tx) = &events {
        tx.send(ProcessEvent::Started { total: files.len() }).ok();
    }

    let entries: Vec<BatchEntry> = files
        .par_iter()
        .enumerate()
        .map_with(events, |events, (i, source)| {
            let output = output_path_for(source, input_dir, output_dir);
            let job = TransformJob::new(source.clone(), output.clone());
            let result = transform_file(backend, &job, request);
            let event = match &result {
                Ok(outcome) => ProcessEvent::Transformed {
                    index: i + 1,
                    source: display_relative(source, input_dir),
                    output: output.display().to_string(),
                    source_size: outcome.source_size,
                    output_size: outcome.output_size,
                },
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "transform failed");
                    ProcessEvent::Failed {
                        index: i + 1,
                        source: display_relative(source, input_dir),
                        error: e.to_string(),
                    }
                }
            };
            if let Some(tx) = events {
                tx.send(event).ok();
            }
            BatchEntry {
                source: source.clone(),
                output,
                result: result
                    .map(|o| o.output_size)
                    .map_err(|e: OperationError| e.to_string()),
            }
        })
        .collect();

    Ok(BatchSummary { entries })
}

fn display_relative(source: &Path, input_dir: &Path) -> String {
    source
        .strip_prefix(input_dir)
        .unwrap_or(source)
        .display()
        .to_string()
}
