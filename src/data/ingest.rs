//! Background ingestion.
//!
//! Parsing a large file should not stall the UI thread, so each load runs on
//! its own worker and reports back over a channel. Only the newest
//! submission can ever deliver a result: submitting again raises the
//! previous job's cancel flag and drops its receiver.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use super::error::{PipelineError, Result};
use super::loader::{load_file_cancellable, read_dataset, IngestOptions};
use super::model::LoadedDataset;

/// Where a job reads its input from.
#[derive(Debug, Clone)]
pub enum Source {
    File(PathBuf),
    Text(String),
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Text(text) => format!("<{} bytes of text>", text.len()),
        }
    }
}

/// Result of the current job, tagged with its generation.
#[derive(Debug)]
pub struct IngestOutcome {
    pub generation: u64,
    pub result: Result<LoadedDataset>,
}

struct Job {
    generation: u64,
    cancel: Arc<AtomicBool>,
    rx: Receiver<Result<LoadedDataset>>,
}

/// Owns at most one in-flight ingestion.
#[derive(Default)]
pub struct IngestQueue {
    next_generation: u64,
    current: Option<Job>,
}

impl IngestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ingesting `source`, superseding any job still running.
    /// Returns the new job's generation.
    pub fn submit(&mut self, source: Source, options: IngestOptions) -> Result<u64> {
        self.cancel();

        self.next_generation += 1;
        let generation = self.next_generation;
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = channel();

        let flag = Arc::clone(&cancel);
        let label = source.describe();
        std::thread::Builder::new()
            .name(format!("ingest-{generation}"))
            .spawn(move || {
                let result = match &source {
                    Source::File(path) => load_file_cancellable(path, &options, &flag),
                    Source::Text(text) => read_dataset(text.as_bytes(), &options, &flag),
                };
                if flag.load(Ordering::Relaxed) {
                    log::warn!("discarding superseded ingestion of {label}");
                    return;
                }
                // The receiver is gone only if the job was superseded.
                let _ = tx.send(result);
            })?;

        log::debug!("submitted ingestion #{generation}");
        self.current = Some(Job {
            generation,
            cancel,
            rx,
        });
        Ok(generation)
    }

    /// Abort the running job, if any. Its result will never be delivered.
    pub fn cancel(&mut self) {
        if let Some(job) = self.current.take() {
            job.cancel.store(true, Ordering::Relaxed);
            log::debug!("cancelled ingestion #{}", job.generation);
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Non-blocking check for the current job's result.
    pub fn poll(&mut self) -> Option<IngestOutcome> {
        let job = self.current.as_ref()?;
        let result = match job.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(PipelineError::Cancelled),
        };
        self.finish(result)
    }

    /// Block until the current job finishes. `None` when nothing is queued.
    pub fn wait(&mut self) -> Option<IngestOutcome> {
        let job = self.current.as_ref()?;
        let result = job.rx.recv().unwrap_or(Err(PipelineError::Cancelled));
        self.finish(result)
    }

    fn finish(&mut self, result: Result<LoadedDataset>) -> Option<IngestOutcome> {
        let job = self.current.take()?;
        Some(IngestOutcome {
            generation: job.generation,
            result,
        })
    }
}

impl Drop for IngestQueue {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Source {
        Source::Text(s.to_owned())
    }

    #[test]
    fn delivers_result_of_single_job() {
        let mut queue = IngestQueue::new();
        let generation = queue
            .submit(text("x,y\n1,2\n3,4\n"), IngestOptions::default())
            .unwrap();
        assert!(queue.is_busy());

        let outcome = queue.wait().unwrap();
        assert_eq!(outcome.generation, generation);
        let ds = outcome.result.unwrap();
        assert_eq!(ds.store.column("y"), Some(&[2.0, 4.0][..]));
        assert!(!queue.is_busy());
        assert!(queue.wait().is_none());
    }

    #[test]
    fn only_the_latest_submission_is_delivered() {
        let mut queue = IngestQueue::new();
        let first = queue
            .submit(text("a,b\n1,2\n"), IngestOptions::default())
            .unwrap();
        let second = queue
            .submit(text("x,y\n5,6\n"), IngestOptions::default())
            .unwrap();
        assert!(second > first);

        let outcome = queue.wait().unwrap();
        assert_eq!(outcome.generation, second);
        let ds = outcome.result.unwrap();
        assert_eq!(ds.schema.names(), &["x".to_string(), "y".to_string()]);
        assert!(queue.poll().is_none());
    }

    #[test]
    fn errors_are_delivered() {
        let mut queue = IngestQueue::new();
        queue
            .submit(text("x,label\n1,a\n"), IngestOptions::default())
            .unwrap();
        let outcome = queue.wait().unwrap();
        assert!(matches!(
            outcome.result,
            Err(PipelineError::Schema { found: 1 })
        ));
    }

    #[test]
    fn cancel_discards_the_job() {
        let mut queue = IngestQueue::new();
        queue
            .submit(text("x,y\n1,2\n"), IngestOptions::default())
            .unwrap();
        queue.cancel();
        assert!(!queue.is_busy());
        assert!(queue.poll().is_none());
        assert!(queue.wait().is_none());
    }

    #[test]
    fn poll_eventually_yields() {
        let mut queue = IngestQueue::new();
        queue
            .submit(text("x,y\n1,2\n"), IngestOptions::default())
            .unwrap();
        let outcome = loop {
            if let Some(outcome) = queue.poll() {
                break outcome;
            }
            std::thread::yield_now();
        };
        assert!(outcome.result.is_ok());
    }
}
