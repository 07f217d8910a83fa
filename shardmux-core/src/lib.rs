pub mod error;
pub mod types;
pub mod config;
pub mod rule; // sharding rule lookups
pub mod parsing; // sharding-condition extraction
pub mod merge; // shard result merging and pagination

pub use error::{Error, Result};
pub use types::*;
pub use config::EngineConfig;
pub use rule::{ShardingRule, ShardingRuleConfig, TableRuleConfig, TableShardingRule};
pub use parsing::{SqlParsingEngine, SqlStatement};
pub use merge::{ColumnReader, MergeEngine, MergedResult, QueryResult};
