//! Serialized job queue for pipeline runs.
//!
//! Submissions are processed strictly one at a time by a single worker
//! task; the pipeline itself runs on the blocking pool so file I/O never
//! stalls the runtime. Each job gets its own progress stream and a
//! one-shot result, and successful exports are appended to a shared,
//! bounded history.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::ExtractionConfig;
use crate::errors::{ExtractorError, Result};
use crate::pipeline::{ExtractionPipeline, PipelineEvent, RunOutcome, RunRequest};
use crate::stats::{History, HistoryEntry};

struct Job {
    id: u64,
    config: Arc<ExtractionConfig>,
    request: RunRequest,
    events: mpsc::UnboundedSender<PipelineEvent>,
    reply: oneshot::Sender<Result<RunOutcome>>,
}

struct Shared {
    busy: AtomicBool,
    pending: AtomicUsize,
    next_id: AtomicU64,
    history: Mutex<History>,
}

impl Shared {
    fn history(&self) -> std::sync::MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Caller's side of a submitted job.
pub struct JobHandle {
    pub id: u64,
    events: mpsc::UnboundedReceiver<PipelineEvent>,
    result: oneshot::Receiver<Result<RunOutcome>>,
}

impl JobHandle {
    /// Next progress or state event; `None` once the job has finished.
    pub async fn next_event(&mut self) -> Option<PipelineEvent> {
        self.events.recv().await
    }

    /// Wait for the job to finish, discarding any unread events.
    pub async fn wait(self) -> Result<RunOutcome> {
        self.result
            .await
            .map_err(|_| ExtractorError::internal("worker dropped job without replying"))?
    }

    /// Drain every event, handing each to `on_event`, then return the result.
    pub async fn follow(mut self, mut on_event: impl FnMut(PipelineEvent)) -> Result<RunOutcome> {
        while let Some(event) = self.events.recv().await {
            on_event(event);
        }
        self.wait().await
    }
}

/// Single-worker queue. Must be created inside a tokio runtime.
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Job>,
    shared: Arc<Shared>,
    worker: JoinHandle<()>,
}

impl TaskQueue {
    pub fn start(history_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            busy: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
            history: Mutex::new(History::with_capacity(history_capacity)),
        });
        let worker = tokio::spawn(worker_loop(receiver, Arc::clone(&shared)));
        Self {
            sender,
            shared,
            worker,
        }
    }

    /// Queue a run. The configuration is validated before the job is accepted.
    pub fn submit(&self, config: Arc<ExtractionConfig>, request: RunRequest) -> Result<JobHandle> {
        config.validate()?;

        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = oneshot::channel();

        self.shared.pending.fetch_add(1, Ordering::SeqCst);
        let job = Job {
            id,
            config,
            request,
            events: events_tx,
            reply: reply_tx,
        };
        if self.sender.send(job).is_err() {
            self.shared.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(ExtractorError::internal("job queue worker has stopped"));
        }
        tracing::debug!(job = id, "job queued");

        Ok(JobHandle {
            id,
            events: events_rx,
            result: reply_rx,
        })
    }

    /// Submit and wait for the result.
    pub async fn run(&self, config: Arc<ExtractionConfig>, request: RunRequest) -> Result<RunOutcome> {
        self.submit(config, request)?.wait().await
    }

    /// True while the worker is executing a job.
    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::SeqCst)
    }

    /// Jobs accepted but not yet started.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::SeqCst)
    }

    /// Copy of the export history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.shared.history().snapshot()
    }

    /// Stop accepting jobs and wait for queued ones to finish.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.sender);
        self.worker.await?;
        Ok(())
    }
}

async fn worker_loop(mut receiver: mpsc::UnboundedReceiver<Job>, shared: Arc<Shared>) {
    while let Some(job) = receiver.recv().await {
        let Job {
            id,
            config,
            request,
            events,
            reply,
        } = job;

        shared.pending.fetch_sub(1, Ordering::SeqCst);
        shared.busy.store(true, Ordering::SeqCst);
        tracing::debug!(job = id, sources = request.sources.len(), "job started");

        let result = tokio::task::spawn_blocking(move || {
            ExtractionPipeline::new(&config).run_with(&request, &mut |event| {
                let _ = events.send(event);
            })
        })
        .await
        .unwrap_or_else(|join_err| Err(join_err.into()));

        if let Ok(outcome) = &result
            && let Some(entry) = outcome.history_entry()
        {
            shared.history().push(entry);
        }

        shared.busy.store(false, Ordering::SeqCst);
        tracing::debug!(job = id, ok = result.is_ok(), "job finished");

        if reply.send(result).is_err() {
            tracing::warn!(job = id, "job result dropped, caller went away");
        }
    }
}
