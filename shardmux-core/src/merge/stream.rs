//! Base merge: drains shard results one after another in routing order.

use crate::merge::{ColumnReader, MergedResult, QueryResult};
use crate::{Error, Result, Value};
use tracing::trace;

pub struct IteratorStreamMergedResult {
    query_results: Vec<Box<dyn QueryResult>>,
    /// Shard currently being drained; equals the shard count once exhausted
    current: usize,
    on_row: bool,
}

impl IteratorStreamMergedResult {
    pub fn new(query_results: Vec<Box<dyn QueryResult>>) -> Self {
        Self {
            query_results,
            current: 0,
            on_row: false,
        }
    }

    fn current_result(&self) -> Result<&dyn QueryResult> {
        if !self.on_row {
            return Err(Error::InvalidArgument("Merged cursor is not positioned on a row".into()));
        }
        Ok(self.query_results[self.current].as_ref())
    }
}

impl MergedResult for IteratorStreamMergedResult {
    fn next(&mut self) -> Result<bool> {
        while self.current < self.query_results.len() {
            if self.query_results[self.current].next()? {
                self.on_row = true;
                return Ok(true);
            }
            trace!("Shard result {} exhausted", self.current);
            self.current += 1;
        }
        self.on_row = false;
        Ok(false)
    }
}

impl ColumnReader for IteratorStreamMergedResult {
    fn value(&self, index: usize) -> Result<Value> {
        self.current_result()?.value(index)
    }

    fn value_by_label(&self, label: &str) -> Result<Value> {
        self.current_result()?.value_by_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MemoryQueryResult;

    fn shard(ids: &[i64]) -> Box<dyn QueryResult> {
        Box::new(MemoryQueryResult::new(
            vec!["id".into()],
            ids.iter().map(|id| vec![Value::Int(*id)]).collect(),
        ))
    }

    #[test]
    fn test_drains_shards_in_order() {
        let mut merged = IteratorStreamMergedResult::new(vec![
            shard(&[1, 2]),
            shard(&[]),
            shard(&[3]),
        ]);

        let mut ids = Vec::new();
        while merged.next().unwrap() {
            ids.push(merged.i64_value(0).unwrap().unwrap());
        }
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(!merged.next().unwrap());
    }

    #[test]
    fn test_label_access_forwards_to_current_shard() {
        let mut merged = IteratorStreamMergedResult::new(vec![shard(&[5])]);
        merged.next().unwrap();
        assert_eq!(merged.value_by_label("ID").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_access_without_row_fails() {
        let mut merged = IteratorStreamMergedResult::new(vec![shard(&[])]);
        assert!(merged.value(0).is_err());
        assert!(!merged.next().unwrap());
        assert!(merged.value(0).is_err());
    }
}
