//! OFFSET/LIMIT over a merged stream.
//!
//! Shard SQL is rewritten to fetch from row 0, so the merged stream still
//! contains the rows the client asked to skip. The decorator drops the first
//! `offset` rows lazily on the first `next()` and then hands out at most
//! `row_count` rows, never buffering.

use crate::merge::{ColumnReader, MergedResult};
use crate::{Result, Value};
use tracing::debug;

pub struct LimitDecoratorMergedResult {
    inner: Box<dyn MergedResult>,
    offset: usize,
    /// None means unbounded
    row_count: Option<usize>,
    skipped: bool,
    /// Rows skipped so far; lets an interrupted skip resume where it stopped
    skipped_rows: usize,
    rows_returned: usize,
    /// Inner stream returned false; it is never advanced again
    exhausted: bool,
}

impl LimitDecoratorMergedResult {
    pub fn new(inner: Box<dyn MergedResult>, offset: usize, row_count: Option<usize>) -> Self {
        Self {
            inner,
            offset,
            row_count,
            skipped: false,
            skipped_rows: 0,
            rows_returned: 0,
            exhausted: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn row_count(&self) -> Option<usize> {
        self.row_count
    }

    pub fn rows_returned(&self) -> usize {
        self.rows_returned
    }

    fn skip_offset(&mut self) -> Result<()> {
        while self.skipped_rows < self.offset {
            if !self.inner.next()? {
                debug!(
                    "Merged stream exhausted after {} rows while skipping offset {}",
                    self.skipped_rows, self.offset
                );
                self.exhausted = true;
                break;
            }
            self.skipped_rows += 1;
        }
        self.skipped = true;
        Ok(())
    }
}

impl MergedResult for LimitDecoratorMergedResult {
    fn next(&mut self) -> Result<bool> {
        if !self.skipped {
            self.skip_offset()?;
        }
        if self.exhausted {
            return Ok(false);
        }
        if let Some(row_count) = self.row_count {
            if self.rows_returned >= row_count {
                return Ok(false);
            }
        }
        if self.inner.next()? {
            self.rows_returned += 1;
            Ok(true)
        } else {
            self.exhausted = true;
            Ok(false)
        }
    }
}

impl ColumnReader for LimitDecoratorMergedResult {
    fn value(&self, index: usize) -> Result<Value> {
        self.inner.value(index)
    }

    fn value_by_label(&self, label: &str) -> Result<Value> {
        self.inner.value_by_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::{IteratorStreamMergedResult, MemoryQueryResult, QueryResult};
    use crate::Error;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Stream of `total` rows counting every call to `next`
    struct CountingMergedResult {
        total: usize,
        produced: usize,
        calls: Arc<AtomicUsize>,
        calls_after_exhaustion: Arc<AtomicUsize>,
        exhausted: bool,
    }

    impl CountingMergedResult {
        fn boxed(total: usize) -> (Box<dyn MergedResult>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            let inner = Self {
                total,
                produced: 0,
                calls: calls.clone(),
                calls_after_exhaustion: after.clone(),
                exhausted: false,
            };
            (Box::new(inner), calls, after)
        }
    }

    impl MergedResult for CountingMergedResult {
        fn next(&mut self) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.exhausted {
                self.calls_after_exhaustion.fetch_add(1, Ordering::SeqCst);
                return Ok(false);
            }
            if self.produced < self.total {
                self.produced += 1;
                Ok(true)
            } else {
                self.exhausted = true;
                Ok(false)
            }
        }
    }

    impl ColumnReader for CountingMergedResult {
        fn value(&self, _index: usize) -> Result<Value> {
            Ok(Value::Int(self.produced as i64))
        }

        fn value_by_label(&self, _label: &str) -> Result<Value> {
            Ok(Value::Int(self.produced as i64))
        }
    }

    /// Fails on the call after `fail_at` successful rows
    struct FlakyMergedResult {
        rows: usize,
        fail_at: usize,
        failed: bool,
    }

    impl MergedResult for FlakyMergedResult {
        fn next(&mut self) -> Result<bool> {
            if self.rows == self.fail_at && !self.failed {
                self.failed = true;
                return Err(Error::QueryResult("connection reset".into()));
            }
            self.rows += 1;
            Ok(self.rows <= 10)
        }
    }

    impl ColumnReader for FlakyMergedResult {
        fn value(&self, _index: usize) -> Result<Value> {
            Ok(Value::Int(self.rows as i64))
        }

        fn value_by_label(&self, _label: &str) -> Result<Value> {
            Ok(Value::Int(self.rows as i64))
        }
    }

    fn count_true(merged: &mut LimitDecoratorMergedResult) -> usize {
        let mut n = 0;
        while merged.next().unwrap() {
            n += 1;
        }
        n
    }

    #[test]
    fn test_skip_all_with_max_offset() {
        let (inner, calls, after) = CountingMergedResult::boxed(8);
        let mut merged = LimitDecoratorMergedResult::new(inner, i32::MAX as usize, None);

        assert!(!merged.next().unwrap());
        assert!(!merged.next().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 9);
        assert_eq!(after.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_offset_without_row_count() {
        let (inner, _, _) = CountingMergedResult::boxed(8);
        let mut merged = LimitDecoratorMergedResult::new(inner, 2, None);
        assert_eq!(count_true(&mut merged), 6);
        assert!(!merged.next().unwrap());
    }

    #[test]
    fn test_offset_with_row_count() {
        let (inner, _, _) = CountingMergedResult::boxed(8);
        let mut merged = LimitDecoratorMergedResult::new(inner, 2, Some(2));
        assert!(merged.next().unwrap());
        assert!(merged.next().unwrap());
        assert!(!merged.next().unwrap());
        assert_eq!(merged.rows_returned(), 2);
    }

    #[test]
    fn test_zero_row_count_returns_nothing() {
        let (inner, calls, _) = CountingMergedResult::boxed(8);
        let mut merged = LimitDecoratorMergedResult::new(inner, 0, Some(0));
        assert!(!merged.next().unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_column_access_forwards_to_inner() {
        let shard = MemoryQueryResult::new(
            vec!["id".into()],
            vec![vec![Value::Int(10)], vec![Value::Int(20)]],
        );
        let inner = IteratorStreamMergedResult::new(vec![Box::new(shard) as Box<dyn QueryResult>]);
        let mut merged = LimitDecoratorMergedResult::new(Box::new(inner), 1, None);

        assert!(merged.next().unwrap());
        assert_eq!(merged.value(0).unwrap(), Value::Int(20));
        assert_eq!(merged.value_by_label("id").unwrap(), Value::Int(20));
    }

    #[test]
    fn test_error_during_skip_resumes_without_double_skipping() {
        let inner = FlakyMergedResult { rows: 0, fail_at: 1, failed: false };
        let mut merged = LimitDecoratorMergedResult::new(Box::new(inner), 3, None);

        assert!(matches!(merged.next(), Err(Error::QueryResult(_))));
        // Skip resumes at row 2 and 3, then row 4 is returned
        assert!(merged.next().unwrap());
        assert_eq!(merged.value(0).unwrap(), Value::Int(4));
    }

    proptest! {
        #[test]
        fn prop_offset_past_end_yields_nothing(total in 0usize..40, extra in 0usize..40) {
            let (inner, calls, after) = CountingMergedResult::boxed(total);
            let mut merged = LimitDecoratorMergedResult::new(inner, total + extra, None);
            for _ in 0..3 {
                prop_assert!(!merged.next().unwrap());
            }
            prop_assert!(calls.load(Ordering::SeqCst) <= total + 1);
            prop_assert_eq!(after.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn prop_unbounded_yields_remaining(total in 1usize..40, offset in 0usize..40) {
            prop_assume!(offset < total);
            let (inner, _, after) = CountingMergedResult::boxed(total);
            let mut merged = LimitDecoratorMergedResult::new(inner, offset, None);
            prop_assert_eq!(count_true(&mut merged), total - offset);
            prop_assert!(!merged.next().unwrap());
            prop_assert_eq!(after.load(Ordering::SeqCst), 0);
        }

        #[test]
        fn prop_bounded_yields_min(total in 1usize..40, offset in 0usize..40, row_count in 0usize..40) {
            prop_assume!(offset < total);
            let (inner, _, _) = CountingMergedResult::boxed(total);
            let mut merged = LimitDecoratorMergedResult::new(inner, offset, Some(row_count));
            prop_assert_eq!(count_true(&mut merged), row_count.min(total - offset));
            prop_assert!(!merged.next().unwrap());
        }
    }
}
