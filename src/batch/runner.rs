//! Sequential batch annotation
//!
//! One tokenizer session handles every document in turn. A run can be
//! cancelled between documents; a failed document never aborts the run.

use super::files::{
    collect_input_files, expand_datetime_placeholders, output_file_name, read_text_file,
    write_text_file, DEFAULT_SUFFIX,
};
use crate::annotator::{AnnotateError, Annotator};
use crate::config::AppConfig;
use crate::output::{CorpusWriter, OutputFormat};
use crate::tokenizer::Tokenizer;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Extension of corpus input files
pub const INPUT_EXTENSION: &str = "txt";

/// Shared flag checked between documents
pub type CancelFlag = Arc<AtomicBool>;

/// Annotate one file and render it in `format`
pub fn annotate_file<T: Tokenizer + ?Sized>(
    tokenizer: &T,
    annotator: &Annotator,
    path: &Path,
    subcorpus_name: &str,
    format: OutputFormat,
) -> Result<String> {
    let text = read_text_file(path)?;
    if text.trim().is_empty() {
        return Err(AnnotateError::EmptyInput.into());
    }

    let tokens = annotator.analyze(tokenizer, &text)?;
    let writer = CorpusWriter::new(&path.to_string_lossy(), subcorpus_name);
    writer.render(format, &tokens)
}

/// Result of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Annotation written to this path
    Written(PathBuf),
    /// Document skipped with a reason
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub input: PathBuf,
    pub outcome: BatchOutcome,
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Written(_))
    }
}

/// Per-document results of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    /// The run stopped early on request
    pub cancelled: bool,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Runs the annotator over many files with a single tokenizer
pub struct BatchRunner<'a, T: Tokenizer + ?Sized> {
    tokenizer: &'a T,
    annotator: &'a Annotator,
    config: &'a AppConfig,
    cancel: CancelFlag,
}

impl<'a, T: Tokenizer + ?Sized> BatchRunner<'a, T> {
    pub fn new(tokenizer: &'a T, annotator: &'a Annotator, config: &'a AppConfig) -> Self {
        Self {
            tokenizer,
            annotator,
            config,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned cancellation flag
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// Handle for requesting cancellation
    pub fn cancel_flag(&self) -> CancelFlag {
        Arc::clone(&self.cancel)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Output folder for a directory run: `{prefix}{folder}{suffix}` under `base`
    pub fn output_dir_for(&self, input_dir: &Path, base: &Path, now: &NaiveDateTime) -> PathBuf {
        let output = self.config.output();
        let folder = input_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string());
        let suffix = if output.suffix.is_empty() {
            DEFAULT_SUFFIX
        } else {
            output.suffix.as_str()
        };
        base.join(format!(
            "{}{}{}",
            output.prefix,
            folder,
            expand_datetime_placeholders(suffix, now)
        ))
    }

    /// Annotate every input file under `input_dir`
    pub fn run_directory<F>(&self, input_dir: &Path, output_base: &Path, progress: F) -> Result<BatchReport>
    where
        F: Fn(usize, usize, &str),
    {
        let recursive = self.config.output().include_subfolders;
        let files = collect_input_files(input_dir, INPUT_EXTENSION, recursive)?;
        let now = Local::now().naive_local();
        let output_dir = self.output_dir_for(input_dir, output_base, &now);

        tracing::info!(
            "Batch annotating {} files from {} into {}",
            files.len(),
            input_dir.display(),
            output_dir.display()
        );

        Ok(self.run(&files, input_dir, &output_dir, &now, progress))
    }

    /// Annotate `files`, mirroring their location relative to `input_root`
    pub fn run<F>(
        &self,
        files: &[PathBuf],
        input_root: &Path,
        output_dir: &Path,
        now: &NaiveDateTime,
        progress: F,
    ) -> BatchReport
    where
        F: Fn(usize, usize, &str),
    {
        let output = self.config.output();
        let total = files.len();
        let mut report = BatchReport::default();

        for (i, path) in files.iter().enumerate() {
            if self.is_cancelled() {
                tracing::info!("Batch cancelled after {} of {} files", i, total);
                report.cancelled = true;
                break;
            }

            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            progress(i + 1, total, &display_name);

            let relative_dir = path
                .parent()
                .and_then(|p| p.strip_prefix(input_root).ok())
                .unwrap_or_else(|| Path::new(""));
            let target = output_dir.join(relative_dir).join(output_file_name(
                path,
                &output.prefix,
                &output.suffix,
                output.format,
                now,
            ));

            let outcome = annotate_file(
                self.tokenizer,
                self.annotator,
                path,
                self.config.subcorpus_name(),
                output.format,
            )
            .and_then(|content| write_text_file(&content, &target));

            let outcome = match outcome {
                Ok(()) => BatchOutcome::Written(target),
                Err(e) => {
                    tracing::error!("Failed to annotate {}: {:#}", path.display(), e);
                    BatchOutcome::Failed(format!("{:#}", e))
                }
            };
            report.items.push(BatchItem {
                input: path.clone(),
                outcome,
            });
        }

        report
    }
}
