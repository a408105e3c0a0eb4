// lumen-core/src/ports/source.rs

// What the quality engine needs from storage, without knowing which engine it is.

use crate::domain::record::Dataset;
use crate::error::LumenError;
use async_trait::async_trait;

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Reads every row of `table` as one snapshot.
    async fn load_table(&self, table: &str) -> Result<Dataset, LumenError>;

    fn engine_name(&self) -> &str;
}

#[async_trait]
pub trait TableStore: Send + Sync {
    /// Replaces `table` with the dataset's rows. Returns the number of rows written.
    async fn replace_table(&self, table: &str, dataset: &Dataset) -> Result<usize, LumenError>;
}
