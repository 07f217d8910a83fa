//! Test utilities and fixtures for shardmux testing
//!
//! Builds shard result sets, instrumented cursors and sharding rules so the
//! scenario suites can focus on behavior.

use shardmux_core::merge::{find_column, ColumnReader, MemoryQueryResult, QueryResult};
use shardmux_core::{
    Error, Result, ShardingRuleConfig, TableRuleConfig, TableShardingRule, Value,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Install a tracing subscriber honoring RUST_LOG; safe to call from every test
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `shards` in-memory results of `rows_per_shard` rows each.
///
/// Columns are `shard` and `id`; ids run 0.. across shards in routing order.
pub fn shard_results(shards: usize, rows_per_shard: usize) -> Vec<Box<dyn QueryResult>> {
    (0..shards)
        .map(|shard| {
            let rows = (0..rows_per_shard)
                .map(|i| {
                    vec![
                        Value::Int(shard as i64),
                        Value::Int((shard * rows_per_shard + i) as i64),
                    ]
                })
                .collect();
            Box::new(MemoryQueryResult::new(
                vec!["shard".to_string(), "id".to_string()],
                rows,
            )) as Box<dyn QueryResult>
        })
        .collect()
}

/// Shard results with uneven row counts
pub fn uneven_shard_results(row_counts: &[usize]) -> Vec<Box<dyn QueryResult>> {
    let mut next_id = 0i64;
    row_counts
        .iter()
        .enumerate()
        .map(|(shard, count)| {
            let rows = (0..*count)
                .map(|_| {
                    next_id += 1;
                    vec![Value::Int(shard as i64), Value::Int(next_id - 1)]
                })
                .collect();
            Box::new(MemoryQueryResult::new(
                vec!["shard".to_string(), "id".to_string()],
                rows,
            )) as Box<dyn QueryResult>
        })
        .collect()
}

/// Call counters shared with a [`CountingQueryResult`]
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
    calls_after_exhaustion: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_after_exhaustion(&self) -> usize {
        self.calls_after_exhaustion.load(Ordering::SeqCst)
    }
}

/// Shard result that records every `next` call
pub struct CountingQueryResult {
    inner: MemoryQueryResult,
    counter: CallCounter,
    exhausted: bool,
}

impl CountingQueryResult {
    pub fn new(inner: MemoryQueryResult) -> (Self, CallCounter) {
        let counter = CallCounter::default();
        let result = Self {
            inner,
            counter: counter.clone(),
            exhausted: false,
        };
        (result, counter)
    }
}

impl ColumnReader for CountingQueryResult {
    fn value(&self, index: usize) -> Result<Value> {
        self.inner.value(index)
    }

    fn value_by_label(&self, label: &str) -> Result<Value> {
        self.inner.value_by_label(label)
    }
}

impl QueryResult for CountingQueryResult {
    fn next(&mut self) -> Result<bool> {
        self.counter.calls.fetch_add(1, Ordering::SeqCst);
        if self.exhausted {
            self.counter.calls_after_exhaustion.fetch_add(1, Ordering::SeqCst);
        }
        let more = self.inner.next()?;
        if !more {
            self.exhausted = true;
        }
        Ok(more)
    }

    fn column_count(&self) -> usize {
        self.inner.column_count()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        self.inner.column_label(index)
    }
}

/// Counted shard results, one counter per shard
pub fn counted_shard_results(
    shards: usize,
    rows_per_shard: usize,
) -> (Vec<Box<dyn QueryResult>>, Vec<CallCounter>) {
    let mut results: Vec<Box<dyn QueryResult>> = Vec::new();
    let mut counters = Vec::new();
    for shard in 0..shards {
        let rows = (0..rows_per_shard)
            .map(|i| vec![Value::Int(shard as i64), Value::Int((shard * rows_per_shard + i) as i64)])
            .collect();
        let (result, counter) = CountingQueryResult::new(MemoryQueryResult::new(
            vec!["shard".to_string(), "id".to_string()],
            rows,
        ));
        results.push(Box::new(result));
        counters.push(counter);
    }
    (results, counters)
}

/// Shard result that fails after yielding `rows_before_failure` rows
pub struct FailingQueryResult {
    rows_before_failure: usize,
    produced: usize,
}

impl FailingQueryResult {
    pub fn new(rows_before_failure: usize) -> Self {
        Self {
            rows_before_failure,
            produced: 0,
        }
    }
}

impl ColumnReader for FailingQueryResult {
    fn value(&self, index: usize) -> Result<Value> {
        match index {
            0 => Ok(Value::Int(self.produced as i64)),
            _ => Err(Error::ColumnNotFound(format!("index {}", index))),
        }
    }

    fn value_by_label(&self, label: &str) -> Result<Value> {
        let index = find_column(self, label)?;
        self.value(index)
    }
}

impl QueryResult for FailingQueryResult {
    fn next(&mut self) -> Result<bool> {
        if self.produced == self.rows_before_failure {
            return Err(Error::QueryResult("lost connection to shard".into()));
        }
        self.produced += 1;
        Ok(true)
    }

    fn column_count(&self) -> usize {
        1
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        match index {
            0 => Ok("id"),
            _ => Err(Error::ColumnNotFound(format!("index {}", index))),
        }
    }
}

/// Drain a merged cursor and collect the `id` column
pub fn collect_ids(merged: &mut dyn shardmux_core::MergedResult) -> anyhow::Result<Vec<i64>> {
    let mut ids = Vec::new();
    while merged.next()? {
        let id = merged
            .value_by_label("id")?
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("id column is not an integer"))?;
        ids.push(id);
    }
    Ok(ids)
}

/// Rule used across suites: `t_order` routed by `user_id` with generated
/// `order_id`, `t_user` routed by `id`
pub fn user_rule() -> TableShardingRule {
    user_rule_config().build().expect("Failed to build rule")
}

pub fn user_rule_config() -> ShardingRuleConfig {
    ShardingRuleConfig::new()
        .with_table(
            TableRuleConfig::new("t_order")
                .with_sharding_column("user_id")
                .with_auto_increment_column("order_id"),
        )
        .with_table(TableRuleConfig::new("t_user").with_sharding_column("id"))
}

/// Rule config written to a temporary JSON file that lives as long as the handle
pub struct RuleFile {
    pub path: PathBuf,
    _file: NamedTempFile,
}

impl RuleFile {
    pub fn new(json: &str) -> Self {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(json.as_bytes()).expect("Failed to write rule file");
        file.flush().expect("Failed to flush rule file");
        Self {
            path: file.path().to_path_buf(),
            _file: file,
        }
    }
}
