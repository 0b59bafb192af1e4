//! Batches of conversions: ordering, failure isolation and progress across files.

use std::path::PathBuf;

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::codec::Codec;
use crate::convert::{checkpoint, convert_file, ConversionResult};
use crate::error::ErrorKind;
use crate::output_path::per_file_targets;
use crate::request::ConversionRequest;

/// Plan of conversions for the whole run over multiple files
#[derive(Debug, Clone)]
pub struct BatchPlan {
    requests: Vec<ConversionRequest>,
    /// Worker threads. 1 converts strictly sequentially on the calling thread.
    jobs: usize,
}

/// One progress tick, as delivered to a [`ProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub file_index: usize,
    /// Checkpoint reached within the current file, 0-100.
    pub file_progress: u8,
    /// The whole batch, 0-100.
    pub overall_progress: u8,
    /// File name of the current input, without its directory.
    pub current_file: String,
    pub total_files: usize,
}

/// Receives progress ticks. Ticks are advisory: consumers must not rely on
/// seeing every checkpoint of every file.
pub trait ProgressSink: Sync {
    fn on_progress(&self, event: ProgressEvent);
}

impl<F: Fn(ProgressEvent) + Sync> ProgressSink for F {
    fn on_progress(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards all progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _event: ProgressEvent) {}
}

/// Result for one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum FileOutcome {
    Success(ConversionResult),
    Failure {
        input_path: PathBuf,
        kind: ErrorKind,
        error: String,
    },
}

impl FileOutcome {
    pub fn input_path(&self) -> &PathBuf {
        match self {
            Self::Success(result) => &result.input_path,
            Self::Failure { input_path, .. } => input_path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Outcomes in input order, exactly one per input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchOutcome {
    pub entries: Vec<FileOutcome>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

impl BatchPlan {
    /// Applies `template` to every input. With several inputs and one explicit
    /// output file, each output gets its own numbered name.
    pub fn new(inputs: impl IntoIterator<Item = PathBuf>, template: &ConversionRequest) -> Self {
        let inputs: Vec<PathBuf> = inputs.into_iter().collect();
        let targets = per_file_targets(&template.output, inputs.len());
        let requests = inputs
            .into_iter()
            .zip(targets)
            .map(|(input_path, output)| ConversionRequest {
                input_path,
                output,
                ..template.clone()
            })
            .collect();
        Self::from_requests(requests)
    }

    pub fn from_requests(requests: Vec<ConversionRequest>) -> Self {
        Self { requests, jobs: 1 }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn requests(&self) -> &[ConversionRequest] {
        &self.requests
    }

    /// Converts every file. A failing file is recorded and the batch moves on.
    pub fn execute<C: Codec>(&self, codec: &C, progress: &dyn ProgressSink) -> BatchOutcome {
        let tracker = ProgressTracker::new(self.requests.len(), progress);
        let entries = if self.jobs > 1 && self.requests.len() > 1 {
            self.execute_parallel(codec, &tracker)
        } else {
            self.execute_sequential(codec, &tracker)
        };
        let outcome = BatchOutcome { entries };
        info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "batch finished"
        );
        outcome
    }

    fn execute_sequential<C: Codec>(&self, codec: &C, tracker: &ProgressTracker) -> Vec<FileOutcome> {
        self.requests
            .iter()
            .enumerate()
            .map(|(index, request)| convert_one(codec, index, request, tracker))
            .collect()
    }

    fn execute_parallel<C: Codec>(&self, codec: &C, tracker: &ProgressTracker) -> Vec<FileOutcome> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("dpix-worker-{i}"))
            .build();
        match pool {
            // indexed collect keeps input order whatever order files finish in
            Ok(pool) => pool.install(|| {
                self.requests
                    .par_iter()
                    .enumerate()
                    .map(|(index, request)| convert_one(codec, index, request, tracker))
                    .collect()
            }),
            Err(e) => {
                warn!("cannot start {} worker threads, converting sequentially: {e}", self.jobs);
                self.execute_sequential(codec, tracker)
            }
        }
    }
}

fn convert_one<C: Codec>(
    codec: &C,
    index: usize,
    request: &ConversionRequest,
    tracker: &ProgressTracker,
) -> FileOutcome {
    let span = info_span!("convert", file = %request.input_path.display());
    let _guard = span.enter();
    let file_name = request
        .input_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match convert_file(codec, request, |percent| {
        tracker.report(index, percent, &file_name)
    }) {
        Ok(result) => {
            info!(
                output = %result.output_path.display(),
                savings_percent = result.savings_percent,
                "converted"
            );
            FileOutcome::Success(result)
        }
        Err(e) => {
            warn!("{e}");
            tracker.finish_silently(index);
            FileOutcome::Failure {
                input_path: request.input_path.clone(),
                kind: e.kind(),
                error: e.to_string(),
            }
        }
    }
}

/// Per-file percentages of a running batch.
struct ProgressTracker<'a> {
    per_file: Mutex<Vec<u8>>,
    sink: &'a dyn ProgressSink,
}

impl<'a> ProgressTracker<'a> {
    fn new(total_files: usize, sink: &'a dyn ProgressSink) -> Self {
        Self {
            per_file: Mutex::new(vec![0; total_files]),
            sink,
        }
    }

    fn report(&self, index: usize, file_progress: u8, current_file: &str) {
        let mut per_file = self.per_file.lock();
        per_file[index] = per_file[index].max(file_progress);
        let event = ProgressEvent {
            file_index: index,
            file_progress,
            overall_progress: overall_percent(&per_file),
            current_file: current_file.to_owned(),
            total_files: per_file.len(),
        };
        debug!(file_progress, overall = event.overall_progress, "progress");
        // delivered under the lock so the overall percentage never goes backwards
        self.sink.on_progress(event);
    }

    /// A failed file counts as done for the overall percentage but emits no tick.
    fn finish_silently(&self, index: usize) {
        self.per_file.lock()[index] = checkpoint::DONE;
    }
}

/// Mean of the per-file percentages, rounded half up.
///
/// Processing sequentially, with files before `i` done and file `i` at `p`,
/// this equals `round((i + p/100) / total * 100)`.
fn overall_percent(per_file: &[u8]) -> u8 {
    if per_file.is_empty() {
        return 0;
    }
    let total = per_file.len() as u64;
    let sum: u64 = per_file.iter().map(|&p| u64::from(p)).sum();
    ((sum * 2 + total) / (total * 2)) as u8
}
