//! WHERE-style filter expressions
//!
//! Text is scanned into tokens, parsed into an [`Expression`] tree and then
//! evaluated against parsed objects with [`Expression::matches`].

mod evaluate;
mod expression;
mod parser;
mod scanner;
mod tokens;

pub use evaluate::is_like;
pub use expression::{BinaryOp, Expression, UnaryOp};
pub use parser::{compile_filter, parse_tokens, parse_where, FilterError};
pub use scanner::scan;
pub use tokens::{keyword, operator, Token, TokenKind};
