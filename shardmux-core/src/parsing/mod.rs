//! Statement parsing for shard routing.
//!
//! The lexer flattens SQL into typed tokens, a [`SqlParser`] session walks
//! them, and the INSERT parsers record sharding conditions into the
//! statement's [`ConditionContext`].

pub mod context;
pub mod engine;
pub mod expr;
pub mod insert;
pub mod lexer;
pub mod limit;
pub mod parser;
pub mod statement;

pub use context::*;
pub use engine::*;
pub use expr::*;
pub use insert::*;
pub use lexer::*;
pub use limit::*;
pub use parser::*;
pub use statement::*;
