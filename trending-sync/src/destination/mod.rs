//! Destination for assembled records.
//!
//! [`RecordSink`] is the boundary the runner writes through;
//! [`BitableSink`] implements it for Feishu Bitable.

mod bitable;
mod config;
mod error;
mod fields;

pub use bitable::{build_fields, BitableSink, MAX_BATCH_SIZE};
pub use config::{BitableConfig, DEFAULT_BITABLE_TIMEOUT_SECS, DEFAULT_FEISHU_BASE_URL};
pub use error::DestinationError;
pub use fields::FieldNames;

use crate::records::OutputRecord;
use async_trait::async_trait;

/// Receives the final, ordered records of a run.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Writes `records` and returns how many were stored.
    async fn write(&self, records: &[OutputRecord]) -> Result<usize, DestinationError>;
}
