//! Download engine: fetch a resolved episode stream and persist it.
//!
//! # Guarantees
//!
//! - Streaming writes (memory-efficient for long episodes)
//! - Deterministic output names so re-downloading overwrites, never appends
//! - Temp-file-then-rename, so no partially-named final file on any failure
//! - Ordered chunk writes, opportunistic progress, cooperative cancellation

mod engine;
mod error;

pub use engine::{DownloadOptions, DownloadRequest, ProgressObserver};
pub use error::DownloadError;

pub(crate) use engine::download_video;
