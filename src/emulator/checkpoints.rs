use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::sui::{BackendError, CheckpointId, LedgerBackend, ReadMask};
use crate::translator::normalize::{Native, Record};
use crate::translator::read_mask::{build, DisplayOptions, CHECKPOINT_MASK};
use crate::translator::checkpoint_to_legacy;

/// Largest page a single call will walk.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A sequence the backend can only read one index at a time.
#[async_trait]
pub trait IndexedSource: Send + Sync {
    type Item: Send;

    /// Highest index currently available.
    async fn head(&self) -> Result<u64, BackendError>;

    /// The item at `index`, `None` when the index does not exist.
    async fn fetch(&self, index: u64) -> Result<Option<Self::Item>, BackendError>;
}

/// One synthesized page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<u64>,
    pub has_next_page: bool,
}

impl<T: Into<Native>> From<Page<T>> for Native {
    fn from(page: Page<T>) -> Self {
        Record::new()
            .field("data", Native::list(page.data))
            .field("nextCursor", page.next_cursor.map(|cursor| cursor.to_string()))
            .field("hasNextPage", page.has_next_page)
            .into()
    }
}

/// Walk up to `limit` indices from `cursor` (or the head when no cursor is
/// given), issuing one lookup per index.
///
/// The walk ends quietly at the first missing index. Any other lookup
/// failure also ends it, keeping what was already fetched. Only the head
/// query can fail the call.
pub async fn paginate<S: IndexedSource + ?Sized>(
    source: &S,
    cursor: Option<u64>,
    limit: u64,
    descending: bool,
) -> Result<Page<S::Item>, BackendError> {
    let start = match cursor {
        Some(cursor) => cursor,
        None => source.head().await?,
    };
    let count = limit.min(MAX_PAGE_SIZE);

    debug!(
        "paginate: start={}, count={}, descending={}",
        start, count, descending
    );

    let step = |offset: u64| -> Option<u64> {
        if descending {
            start.checked_sub(offset)
        } else {
            start.checked_add(offset)
        }
    };

    let mut data = Vec::new();
    for offset in 0..count {
        let Some(index) = step(offset) else {
            break;
        };
        match source.fetch(index).await {
            Ok(Some(item)) => data.push(item),
            Ok(None) => break,
            Err(e) if e.indicates_absence() => break,
            Err(e) => {
                warn!("Stopping walk at index {}: {}", index, e);
                break;
            }
        }
    }

    let fetched = data.len() as u64;
    let next_cursor = if fetched == 0 { None } else { step(fetched) };

    Ok(Page {
        has_next_page: count > 0 && fetched == count && next_cursor.is_some(),
        next_cursor,
        data,
    })
}

/// Checkpoints by sequence number, reshaped into the legacy record.
pub struct CheckpointSource {
    backend: Arc<dyn LedgerBackend>,
    mask: ReadMask,
}

impl CheckpointSource {
    pub fn new(backend: Arc<dyn LedgerBackend>) -> Self {
        Self {
            backend,
            mask: build(CHECKPOINT_MASK, &DisplayOptions::default()),
        }
    }
}

#[async_trait]
impl IndexedSource for CheckpointSource {
    type Item = Native;

    async fn head(&self) -> Result<u64, BackendError> {
        self.backend
            .get_service_info()
            .await?
            .checkpoint_height
            .ok_or(BackendError::MissingField("checkpoint height"))
    }

    async fn fetch(&self, index: u64) -> Result<Option<Native>, BackendError> {
        let checkpoint = self
            .backend
            .get_checkpoint(&CheckpointId::SequenceNumber(index), &self.mask)
            .await?;
        Ok(checkpoint.map(checkpoint_to_legacy))
    }
}
