use std::num::NonZeroUsize;

use bucketwatch_log::{Logger, Logging};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{BatchError, BatchResult};

/// Counters reported when a batching stage finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Items read from the input.
    pub items: usize,
    /// Batches delivered downstream, including a final short one.
    pub batches: usize,
}

/// Groups an ordered stream into batches of a fixed size.
///
/// Single producer, single consumer. Delivering a batch waits for room in the
/// output channel, so a slow consumer throttles reads from the input.
#[derive(Debug)]
pub struct ChannelBatcher {
    batch_size: NonZeroUsize,
    log: Logger,
}

impl ChannelBatcher {
    /// Create a batcher emitting `batch_size` items per batch.
    ///
    /// Fails with [`BatchError::InvalidBatchSize`] if `batch_size` is zero.
    pub fn new(batch_size: usize, logging: &Logging) -> BatchResult<Self> {
        let batch_size =
            NonZeroUsize::new(batch_size).ok_or(BatchError::InvalidBatchSize(batch_size))?;
        Ok(Self {
            batch_size,
            log: logging.logger("channelbatcher"),
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Drain `input` into batches on `output` until the input closes.
    ///
    /// A trailing partial batch is flushed before returning. The output sender
    /// is dropped on return, which closes the channel for the consumer.
    pub async fn run<T: Send>(
        self,
        mut input: mpsc::Receiver<T>,
        output: mpsc::Sender<Vec<T>>,
    ) -> BatchResult<BatchStats> {
        let size = self.batch_size.get();
        let mut buffer = Vec::with_capacity(size);
        let mut stats = BatchStats::default();

        while let Some(item) = input.recv().await {
            buffer.push(item);
            stats.items += 1;
            if buffer.len() == size {
                let batch = std::mem::replace(&mut buffer, Vec::with_capacity(size));
                self.deliver(&output, batch, &mut stats).await?;
            }
        }

        if !buffer.is_empty() {
            self.deliver(&output, buffer, &mut stats).await?;
        }

        self.log.debug(format_args!(
            "input closed: {} items in {} batches",
            stats.items, stats.batches
        ));
        Ok(stats)
    }

    /// Run the stage on its own task.
    ///
    /// Returns the batch receiver (buffering up to `capacity` batches, at
    /// least one) and the task handle.
    pub fn spawn<T: Send + 'static>(
        self,
        input: mpsc::Receiver<T>,
        capacity: usize,
    ) -> (mpsc::Receiver<Vec<T>>, JoinHandle<BatchResult<BatchStats>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(self.run(input, tx));
        (rx, handle)
    }

    async fn deliver<T: Send>(
        &self,
        output: &mpsc::Sender<Vec<T>>,
        batch: Vec<T>,
        stats: &mut BatchStats,
    ) -> BatchResult<()> {
        if let Err(mpsc::error::SendError(batch)) = output.send(batch).await {
            self.log.warn(format_args!(
                "downstream closed, dropping batch of {}",
                batch.len()
            ));
            return Err(BatchError::DownstreamClosed {
                pending: batch.len(),
            });
        }
        stats.batches += 1;
        Ok(())
    }
}
