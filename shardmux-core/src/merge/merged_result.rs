use crate::merge::ColumnReader;
use crate::Result;

/// Logical cursor presenting many shard results as one stream.
///
/// Decorators own exactly one inner `MergedResult` and forward column
/// access to it, so behaviors compose by wrapping.
pub trait MergedResult: ColumnReader + Send {
    /// Advance to the next row; false once the stream is exhausted
    fn next(&mut self) -> Result<bool>;
}
