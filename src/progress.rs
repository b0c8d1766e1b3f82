//! Push progress reporting.
//!
//! Reports each file as it is processed, each batch as it goes out, and the
//! final purge, so a long run is observable. Progress is emitted on
//! **stderr** so stdout stays parseable for scripts.

use std::io::Write;

/// A single progress event for a push run.
#[derive(Clone, Debug)]
pub enum PushProgressEvent {
    /// A file was enumerated and is about to be mapped and batched.
    File { relative_path: String },
    /// A batch went out; `total_documents` counts the whole run so far.
    BatchPushed {
        documents: usize,
        total_documents: u64,
    },
    /// All batches are in; the stale-document purge is being issued.
    Purging,
}

/// Reports push progress. Implementations write to stderr (human or JSON).
pub trait PushProgressReporter: Send + Sync {
    fn report(&self, event: PushProgressEvent);
}

/// Human-friendly progress: one line per file, one per batch.
pub struct StderrProgress;

impl PushProgressReporter for StderrProgress {
    fn report(&self, event: PushProgressEvent) {
        let line = match &event {
            PushProgressEvent::File { relative_path } => format!("{}\n", relative_path),
            PushProgressEvent::BatchPushed {
                documents,
                total_documents,
            } => format!(
                "pushed batch of {} ({} documents so far)\n",
                documents, total_documents
            ),
            PushProgressEvent::Purging => "purging stale documents...\n".to_string(),
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl PushProgressReporter for JsonProgress {
    fn report(&self, event: PushProgressEvent) {
        let obj = match &event {
            PushProgressEvent::File { relative_path } => serde_json::json!({
                "event": "progress",
                "phase": "file",
                "path": relative_path
            }),
            PushProgressEvent::BatchPushed {
                documents,
                total_documents,
            } => serde_json::json!({
                "event": "progress",
                "phase": "batch",
                "documents": documents,
                "total_documents": total_documents
            }),
            PushProgressEvent::Purging => serde_json::json!({
                "event": "progress",
                "phase": "purging"
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl PushProgressReporter for NoProgress {
    fn report(&self, _event: PushProgressEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Builds a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn PushProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
