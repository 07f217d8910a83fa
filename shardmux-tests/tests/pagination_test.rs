/// Pagination tests: OFFSET/LIMIT applied across merged shard results

use proptest::prelude::*;
use shardmux_core::merge::MergeEngine;
use shardmux_core::parsing::{Limit, LimitValue, SqlStatement};
use shardmux_core::{DatabaseType, Error, Value};
use shardmux_test_utils::{
    collect_ids, counted_shard_results, init_tracing, shard_results, uneven_shard_results,
    FailingQueryResult,
};

fn select_with(limit: Limit) -> SqlStatement {
    SqlStatement::select().with_limit(limit)
}

#[test]
fn test_next_for_skip_all() {
    init_tracing();
    let limit = Limit::new(DatabaseType::MySQL).with_offset(LimitValue::new(i32::MAX as i64, None, true));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &[]).merge().unwrap();
    assert!(!actual.next().unwrap());
}

#[test]
fn test_next_without_row_count() {
    let limit = Limit::new(DatabaseType::MySQL).with_offset(LimitValue::new(2, None, true));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &[]).merge().unwrap();
    for _ in 0..6 {
        assert!(actual.next().unwrap());
    }
    assert!(!actual.next().unwrap());
}

#[test]
fn test_next_with_row_count() {
    let limit = Limit::new(DatabaseType::MySQL)
        .with_offset(LimitValue::new(2, None, true))
        .with_row_count(LimitValue::new(2, None, false));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &[]).merge().unwrap();
    assert!(actual.next().unwrap());
    assert!(actual.next().unwrap());
    assert!(!actual.next().unwrap());
}

#[test]
fn test_rows_follow_shard_order() {
    let limit = Limit::new(DatabaseType::MySQL)
        .with_offset(LimitValue::literal(3))
        .with_row_count(LimitValue::literal(3));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &[]).merge().unwrap();
    assert_eq!(collect_ids(actual.as_mut()).unwrap(), vec![3, 4, 5]);
}

#[test]
fn test_skip_all_never_advances_exhausted_shards() {
    let (results, counters) = counted_shard_results(4, 2);
    let limit = Limit::new(DatabaseType::MySQL).with_offset(LimitValue::literal(i32::MAX as i64));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(results, &statement, &[]).merge().unwrap();
    for _ in 0..5 {
        assert!(!actual.next().unwrap());
    }

    let total_calls: usize = counters.iter().map(|c| c.calls()).sum();
    // Each shard: two rows plus the call that reports exhaustion
    assert_eq!(total_calls, 12);
    assert!(counters.iter().all(|c| c.calls_after_exhaustion() == 0));
}

#[test]
fn test_offset_equal_to_total_is_empty() {
    let limit = Limit::new(DatabaseType::MySQL).with_offset(LimitValue::literal(8));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &[]).merge().unwrap();
    assert!(!actual.next().unwrap());
    assert!(!actual.next().unwrap());
}

#[test]
fn test_uneven_shards_with_empty_members() {
    let limit = Limit::new(DatabaseType::MySQL)
        .with_offset(LimitValue::literal(1))
        .with_row_count(LimitValue::literal(4));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(uneven_shard_results(&[0, 3, 0, 1, 5]), &statement, &[])
        .merge()
        .unwrap();
    assert_eq!(collect_ids(actual.as_mut()).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn test_placeholder_limit_from_parameters() {
    let limit = Limit::new(DatabaseType::MySQL)
        .with_offset(LimitValue::placeholder(0))
        .with_row_count(LimitValue::placeholder(1));
    let statement = select_with(limit);
    let params = vec![Value::Int(6), Value::Int(100)];

    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &params).merge().unwrap();
    assert_eq!(collect_ids(actual.as_mut()).unwrap(), vec![6, 7]);
}

#[test]
fn test_shard_failure_propagates() {
    let mut results = shard_results(1, 2);
    results.push(Box::new(FailingQueryResult::new(1)));
    let limit = Limit::new(DatabaseType::MySQL).with_offset(LimitValue::literal(1));
    let statement = select_with(limit);

    let mut actual = MergeEngine::new(results, &statement, &[]).merge().unwrap();
    assert!(actual.next().unwrap());
    assert!(actual.next().unwrap());
    let err = actual.next().unwrap_err();
    assert!(matches!(err, Error::QueryResult(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_abandoned_iteration_drops_cursors() {
    let statement = select_with(Limit::new(DatabaseType::MySQL).with_row_count(LimitValue::literal(1)));
    let mut actual = MergeEngine::new(shard_results(4, 2), &statement, &[]).merge().unwrap();
    assert!(actual.next().unwrap());
    drop(actual);
}

proptest! {
    #[test]
    fn prop_limit_matches_slice(
        row_counts in prop::collection::vec(0usize..6, 1..6),
        offset in 0usize..30,
        row_count in prop::option::of(0usize..30),
    ) {
        let total: usize = row_counts.iter().sum();
        let mut limit = Limit::new(DatabaseType::MySQL).with_offset(LimitValue::literal(offset as i64));
        if let Some(n) = row_count {
            limit.set_row_count(LimitValue::literal(n as i64));
        }
        let statement = select_with(limit);

        let mut actual = MergeEngine::new(uneven_shard_results(&row_counts), &statement, &[])
            .merge()
            .unwrap();
        let ids = collect_ids(actual.as_mut()).unwrap();

        let expected: Vec<i64> = (0..total as i64)
            .skip(offset)
            .take(row_count.unwrap_or(usize::MAX))
            .collect();
        prop_assert_eq!(ids, expected);
        prop_assert!(!actual.next().unwrap());
    }
}
