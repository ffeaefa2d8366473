//! # dmp_query - filter and ordering engine for parsed dump records
//!
//! `filter` turns WHERE-style text into an expression tree that is matched
//! against [`dmp_parser::model::Object`] records. `ordering` sorts result
//! tables with a natural (digit-aware) comparator.

pub mod filter;
pub mod ordering;

// Convenience re-exports
pub use filter::{compile_filter, is_like, parse_where, Expression, FilterError};
pub use ordering::{compare, partition_digits, reorder, Direction, OrderingError, SortKey};

pub mod prelude {
    pub use crate::filter::{
        compile_filter, parse_tokens, parse_where, scan, BinaryOp, Expression, FilterError, Token,
        TokenKind, UnaryOp,
    };

    pub use crate::ordering::{
        compare, compare_natural, parse_sort_keys, reorder, sort_rows, Direction, OrderingError,
        SortKey,
    };
}
