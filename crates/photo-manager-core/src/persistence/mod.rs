mod error;
mod models;
mod query;
mod store;

pub use error::{StoreError, StoreResult};
pub use models::PhotoRecord;
pub use query::RecordQuery;
pub use store::{is_shard_name, read_shard, shard_file_name, RecordStore};

#[cfg(test)]
mod tests;
