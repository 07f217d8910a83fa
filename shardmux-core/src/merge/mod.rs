//! Result merging across shards.
//!
//! Each shard yields a [`QueryResult`]; the [`MergeEngine`] combines them
//! into one [`MergedResult`] chain: a stream merge at the bottom and
//! decorators such as pagination on top.

pub mod engine;
pub mod merged_result;
pub mod pagination;
pub mod query_result;
pub mod stream;

pub use engine::*;
pub use merged_result::*;
pub use pagination::*;
pub use query_result::*;
pub use stream::*;
