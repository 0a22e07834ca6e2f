//! List endpoints the backend does not provide natively, rebuilt from
//! single-item lookups.

pub mod checkpoints;

pub use checkpoints::{paginate, CheckpointSource, IndexedSource, Page, MAX_PAGE_SIZE};
