//! Batch accumulation.
//!
//! Documents buffer here until the configured batch size is reached, then go
//! out as one upsert call. The buffer is owned state, handed to the
//! orchestrator by value — never ambient. The buffer is taken out before the
//! upsert call is awaited, so a failed call still leaves it empty: there is
//! no partial-batch recovery, a failed upsert is fatal to the run.

use anyhow::Result;

use crate::client::IndexClient;
use crate::document::PushDocument;
use crate::token::OrderingToken;

/// Size-bounded document buffer for one run.
pub struct BatchAccumulator {
    source_id: String,
    token: OrderingToken,
    batch_size: usize,
    buffer: Vec<PushDocument>,
    batches_sent: u64,
    documents_sent: u64,
}

impl BatchAccumulator {
    /// `batch_size` must be >= 1; configuration validation rejects the rest.
    pub fn new(source_id: impl Into<String>, token: OrderingToken, batch_size: usize) -> Self {
        debug_assert!(batch_size >= 1);
        Self {
            source_id: source_id.into(),
            token,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            batches_sent: 0,
            documents_sent: 0,
        }
    }

    /// Buffers one document, flushing through `client` when the buffer is
    /// full.
    pub async fn append<C: IndexClient + ?Sized>(
        &mut self,
        document: PushDocument,
        client: &C,
    ) -> Result<()> {
        self.buffer.push(document);
        if self.buffer.len() >= self.batch_size {
            self.flush(client).await?;
        }
        Ok(())
    }

    /// Sends everything currently buffered as one upsert call. A no-op on an
    /// empty buffer — the index rejects empty upserts, so none are ever sent.
    pub async fn flush<C: IndexClient + ?Sized>(&mut self, client: &C) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.buffer);
        client
            .upsert_documents(&self.source_id, &batch, self.token)
            .await?;
        self.batches_sent += 1;
        self.documents_sent += batch.len() as u64;
        Ok(())
    }

    /// Documents buffered but not yet flushed.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    pub fn batches_sent(&self) -> u64 {
        self.batches_sent
    }

    pub fn documents_sent(&self) -> u64 {
        self.documents_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Records upsert batch sizes and tokens; optionally fails every upsert.
    #[derive(Default)]
    struct CountingClient {
        batches: Mutex<Vec<usize>>,
        tokens: Mutex<Vec<u64>>,
        fail: bool,
    }

    #[async_trait]
    impl IndexClient for CountingClient {
        async fn upsert_documents(
            &self,
            _source_id: &str,
            batch: &[PushDocument],
            token: OrderingToken,
        ) -> Result<()> {
            if self.fail {
                bail!("injected upsert failure");
            }
            self.batches.lock().unwrap().push(batch.len());
            self.tokens.lock().unwrap().push(token.value());
            Ok(())
        }

        async fn delete_documents_older_than(
            &self,
            _source_id: &str,
            _token: OrderingToken,
            _cutoff: Option<DateTime<Utc>>,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn doc(n: usize) -> PushDocument {
        PushDocument {
            document_id: format!("file:///tmp/doc-{}", n),
            modified_date: DateTime::<Utc>::UNIX_EPOCH,
            metadata: BTreeMap::new(),
            compressed_binary_data: None,
            compression_type: None,
        }
    }

    #[tokio::test]
    async fn auto_flush_at_batch_size() {
        let client = CountingClient::default();
        let mut acc = BatchAccumulator::new("src", OrderingToken::from_raw(1), 2);

        acc.append(doc(0), &client).await.unwrap();
        assert_eq!(client.batches.lock().unwrap().len(), 0);
        acc.append(doc(1), &client).await.unwrap();
        assert_eq!(*client.batches.lock().unwrap(), vec![2]);
        assert_eq!(acc.pending(), 0);
    }

    #[tokio::test]
    async fn upsert_count_is_ceil_of_documents_over_batch_size() {
        let client = CountingClient::default();
        let mut acc = BatchAccumulator::new("src", OrderingToken::from_raw(1), 2);

        for n in 0..5 {
            acc.append(doc(n), &client).await.unwrap();
        }
        acc.flush(&client).await.unwrap();

        assert_eq!(*client.batches.lock().unwrap(), vec![2, 2, 1]);
        assert_eq!(acc.batches_sent(), 3);
        assert_eq!(acc.documents_sent(), 5);
    }

    #[tokio::test]
    async fn empty_flush_is_a_no_op() {
        let client = CountingClient::default();
        let mut acc = BatchAccumulator::new("src", OrderingToken::from_raw(1), 3);

        acc.flush(&client).await.unwrap();
        acc.flush(&client).await.unwrap();
        assert!(client.batches.lock().unwrap().is_empty());
        assert_eq!(acc.batches_sent(), 0);
    }

    #[tokio::test]
    async fn exact_multiple_needs_no_extra_upsert() {
        let client = CountingClient::default();
        let mut acc = BatchAccumulator::new("src", OrderingToken::from_raw(1), 2);

        for n in 0..4 {
            acc.append(doc(n), &client).await.unwrap();
        }
        // Final flush still runs; with nothing pending it sends nothing.
        acc.flush(&client).await.unwrap();
        assert_eq!(*client.batches.lock().unwrap(), vec![2, 2]);
    }

    #[tokio::test]
    async fn buffer_is_cleared_even_when_upsert_fails() {
        let client = CountingClient {
            fail: true,
            ..Default::default()
        };
        let mut acc = BatchAccumulator::new("src", OrderingToken::from_raw(1), 1);

        assert!(acc.append(doc(0), &client).await.is_err());
        assert_eq!(acc.pending(), 0);

        // A later flush sends nothing: the failed batch is gone for good.
        let ok_client = CountingClient::default();
        acc.flush(&ok_client).await.unwrap();
        assert!(ok_client.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn every_batch_carries_the_run_token() {
        let client = CountingClient::default();
        let token = OrderingToken::from_raw(42);
        let mut acc = BatchAccumulator::new("src", token, 1);

        for n in 0..3 {
            acc.append(doc(n), &client).await.unwrap();
        }
        assert_eq!(*client.tokens.lock().unwrap(), vec![42, 42, 42]);
    }
}
