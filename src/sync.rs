//! Push-then-purge orchestration.
//!
//! Drives the whole run: mint one ordering token, walk the folder, map each
//! file, batch and flush through the index client, then — only after every
//! flush has succeeded — issue the single stale-document purge. Strictly
//! sequential: no concurrent flushes, so the purge needs no completion
//! tracking beyond program order. The client is owned by the run and dropped
//! on every exit path. Dropping the returned future cancels the run cleanly
//! between any two steps; nothing is retried.

use anyhow::Result;

use crate::batch::BatchAccumulator;
use crate::client::IndexClient;
use crate::config::PushConfig;
use crate::document;
use crate::progress::{PushProgressEvent, PushProgressReporter};
use crate::token::OrderingToken;
use crate::walk::FileWalker;

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files: u64,
    pub documents_pushed: u64,
    pub batches: u64,
    pub token: OrderingToken,
    /// False for dry runs; a real run that returns Ok always purged.
    pub purged: bool,
}

/// Runs one synchronization pass.
///
/// With `dry_run` set, files are enumerated and mapped (so size and payload
/// problems still surface) but the client is never called — no upserts and,
/// critically, no purge.
pub async fn run_sync<C: IndexClient>(
    config: &PushConfig,
    client: C,
    reporter: &dyn PushProgressReporter,
    dry_run: bool,
) -> Result<RunSummary> {
    config.validate()?;

    // One token per run, before any file is processed. Every document and
    // the final purge carry this exact value.
    let token = OrderingToken::mint();

    let walker = FileWalker::new(&config.folder, &config.include, config.recursive)?;
    println!(
        "Pushing files \"{}\" from folder \"{}\"...",
        config.include,
        walker.root().display()
    );

    if dry_run {
        return dry_run_pass(config, walker, reporter, token);
    }

    let mut accumulator = BatchAccumulator::new(&config.source_id, token, config.batch_size);
    let mut files = 0u64;

    for descriptor in walker {
        let descriptor = descriptor?;
        reporter.report(PushProgressEvent::File {
            relative_path: descriptor.relative_path.clone(),
        });

        let doc = document::map_file(&descriptor)?;
        files += 1;

        let sent_before = accumulator.batches_sent();
        accumulator.append(doc, &client).await?;
        if accumulator.batches_sent() > sent_before {
            reporter.report(PushProgressEvent::BatchPushed {
                documents: config.batch_size,
                total_documents: accumulator.documents_sent(),
            });
        }
    }

    // The final flush always runs, even when nothing is pending, so the
    // last-batch step is attempted on every run shape.
    let pending = accumulator.pending();
    accumulator.flush(&client).await?;
    if pending > 0 {
        reporter.report(PushProgressEvent::BatchPushed {
            documents: pending,
            total_documents: accumulator.documents_sent(),
        });
    }

    // Reached only when every upsert succeeded: deleting entries that were
    // never refreshed this run is now safe. The index keeps anything stamped
    // with this token; everything older belonged to files that are gone.
    reporter.report(PushProgressEvent::Purging);
    client
        .delete_documents_older_than(&config.source_id, token, None)
        .await?;

    println!("push {}", config.source_id);
    println!("  files: {}", files);
    println!("  documents pushed: {}", accumulator.documents_sent());
    println!("  batches: {}", accumulator.batches_sent());
    println!("  ordering token: {}", token);
    println!("ok");

    Ok(RunSummary {
        files,
        documents_pushed: accumulator.documents_sent(),
        batches: accumulator.batches_sent(),
        token,
        purged: true,
    })
}

fn dry_run_pass(
    config: &PushConfig,
    walker: FileWalker,
    reporter: &dyn PushProgressReporter,
    token: OrderingToken,
) -> Result<RunSummary> {
    let mut files = 0u64;
    let mut metadata_only = 0u64;
    let mut payload_bytes = 0u64;

    for descriptor in walker {
        let descriptor = descriptor?;
        reporter.report(PushProgressEvent::File {
            relative_path: descriptor.relative_path.clone(),
        });
        let doc = document::map_file(&descriptor)?;
        if doc.compressed_binary_data.is_none() {
            metadata_only += 1;
        }
        payload_bytes += descriptor.size;
        files += 1;
    }

    println!("push {} (dry-run)", config.source_id);
    println!("  files found: {}", files);
    println!("  metadata-only (zero-byte): {}", metadata_only);
    println!("  payload bytes: {}", payload_bytes);

    Ok(RunSummary {
        files,
        documents_pushed: 0,
        batches: 0,
        token,
        purged: false,
    })
}
