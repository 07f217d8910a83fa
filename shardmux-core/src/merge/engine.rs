//! Assembles the merged cursor for one statement execution.

use crate::merge::{
    IteratorStreamMergedResult, LimitDecoratorMergedResult, MergedResult, QueryResult,
};
use crate::parsing::SqlStatement;
use crate::{Error, Result, Value};
use tracing::debug;

pub struct MergeEngine<'a> {
    query_results: Vec<Box<dyn QueryResult>>,
    statement: &'a SqlStatement,
    parameters: &'a [Value],
}

impl<'a> MergeEngine<'a> {
    /// `query_results` holds one cursor per routed shard, in routing order
    pub fn new(
        query_results: Vec<Box<dyn QueryResult>>,
        statement: &'a SqlStatement,
        parameters: &'a [Value],
    ) -> Self {
        Self {
            query_results,
            statement,
            parameters,
        }
    }

    /// Build the base stream merge, decorated with the statement's LIMIT if any
    pub fn merge(self) -> Result<Box<dyn MergedResult>> {
        if self.query_results.is_empty() {
            return Err(Error::InvalidArgument("No query results to merge".into()));
        }
        let shard_count = self.query_results.len();
        let base: Box<dyn MergedResult> =
            Box::new(IteratorStreamMergedResult::new(self.query_results));

        let Some(limit) = self.statement.limit() else {
            debug!("Merging {} query results without pagination", shard_count);
            return Ok(base);
        };

        let resolved = limit.resolve(self.parameters)?;
        debug!(
            "Merging {} query results with offset {} and row count {:?}",
            shard_count, resolved.offset, resolved.row_count
        );
        Ok(Box::new(LimitDecoratorMergedResult::new(
            base,
            resolved.offset,
            resolved.row_count,
        )))
    }
}
