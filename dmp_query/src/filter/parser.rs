//! Recursive-descent filter parser
//!
//! There is no precedence table. `AND` and `OR` take the whole rest of the
//! current scope as their right operand, so `A AND B OR C` reads as
//! `A AND (B OR C)`. Structural problems become `Expression::Error` nodes
//! rather than hard failures; `compile_filter` turns them into errors.

use super::expression::{BinaryOp, Expression, UnaryOp};
use super::scanner::scan;
use super::tokens::{Token, TokenKind};
use dmp_parser::config::compile_time::query::{MAX_EXPRESSION_DEPTH, MAX_QUERY_LENGTH};
use dmp_parser::logging::{codes, Code};
use dmp_parser::{log_error, log_success};

/// Reasons a filter cannot be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("error parsing where at : {offset}")]
    Syntax { offset: usize },

    #[error("filter is {length} bytes long; the limit is {max}")]
    TooLong { length: usize, max: usize },

    #[error("filter nests deeper than {max} levels at : {offset}")]
    TooDeep { offset: usize, max: usize },
}

impl FilterError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> Code {
        match self {
            FilterError::Syntax { .. } => codes::query::FILTER_PARSE_ERROR,
            FilterError::TooLong { .. } => codes::query::QUERY_TOO_LONG,
            FilterError::TooDeep { .. } => codes::query::EXPRESSION_TOO_DEEP,
        }
    }

    /// Byte offset in the filter text, where one applies
    pub fn offset(&self) -> Option<usize> {
        match self {
            FilterError::Syntax { offset } | FilterError::TooDeep { offset, .. } => Some(*offset),
            FilterError::TooLong { .. } => None,
        }
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    depth: usize,
    /// Offset where the nesting ceiling was first hit
    too_deep: Option<usize>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            depth: 0,
            too_deep: None,
        }
    }

    fn offset_at(&self, index: usize) -> usize {
        self.tokens
            .get(index)
            .or_else(|| self.tokens.last())
            .map(|token| token.offset)
            .unwrap_or(0)
    }

    fn error_at(&self, index: usize) -> Option<Expression> {
        Some(Expression::Error {
            offset: self.offset_at(index),
        })
    }

    /// Parse from token `i`; returns the index of the first unconsumed token
    fn expression(&mut self, i: usize) -> (usize, Option<Expression>) {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            let offset = self.offset_at(i);
            self.too_deep.get_or_insert(offset);
            return (self.tokens.len(), Some(Expression::Error { offset }));
        }

        self.depth += 1;
        let result = self.expression_body(i);
        self.depth -= 1;
        result
    }

    fn expression_body(&mut self, mut i: usize) -> (usize, Option<Expression>) {
        let tokens = self.tokens;
        let mut last: Option<Expression> = None;
        let mut in_paren = false;

        while i < tokens.len() {
            let token = &tokens[i];
            let at = i;

            match token.kind {
                TokenKind::Comma => return (i, last),

                kind if kind.is_literal() => {
                    last = Some(Expression::Token(token.clone()));
                    i += 1;
                }

                TokenKind::ParenLeft => {
                    in_paren = true;
                    let (next, inner) = self.expression(i + 1);
                    i = next;
                    last = inner;
                }

                TokenKind::ParenRight => {
                    if !in_paren {
                        return (i, last);
                    }
                    i += 1;
                    if last.is_none() {
                        return (i, self.error_at(at));
                    }
                    in_paren = false;
                }

                TokenKind::In => {
                    i += 1;
                    let Some(left) = last.take() else {
                        return (i, self.error_at(at));
                    };
                    match self.list(i) {
                        Some((next, items)) => {
                            i = next;
                            last = Some(Expression::In {
                                left: Box::new(left),
                                items,
                            });
                        }
                        None => return (tokens.len(), self.error_at(at)),
                    }
                }

                TokenKind::Between => {
                    i += 1;
                    let Some(test) = last.take() else {
                        return (i, self.error_at(at));
                    };
                    if tokens.len() - i < 3 {
                        return (i, self.error_at(at));
                    }

                    let (begin, and, end) = (&tokens[i], &tokens[i + 1], &tokens[i + 2]);
                    if and.kind == TokenKind::And
                        && is_bound(begin.kind)
                        && is_bound(end.kind)
                    {
                        last = Some(Expression::between(
                            test,
                            Expression::Token(begin.clone()),
                            Expression::Token(end.clone()),
                        ));
                        i += 3;
                        continue;
                    }

                    let (next, range) = self.expression(i);
                    i = next;
                    match range {
                        Some(Expression::Binary {
                            op: BinaryOp::And,
                            left,
                            right,
                        }) => {
                            last = Some(Expression::Between {
                                test: Box::new(test),
                                begin: left,
                                end: right,
                            });
                        }
                        _ => return (i, self.error_at(at)),
                    }
                }

                TokenKind::Like => {
                    i += 1;
                    let (Some(left), Some(pattern)) = (last.take(), tokens.get(i)) else {
                        return (i, self.error_at(at));
                    };
                    i += 1;
                    if !matches!(
                        pattern.kind,
                        TokenKind::Field | TokenKind::String | TokenKind::Pattern
                    ) {
                        return (i, self.error_at(at));
                    }
                    last = Some(Expression::binary(
                        BinaryOp::Like,
                        left,
                        Expression::Token(pattern.clone()),
                    ));
                }

                TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge => {
                    let kind = token.kind;
                    i += 1;
                    let (Some(left), Some(value), Some(op)) =
                        (last.take(), tokens.get(i), BinaryOp::from_kind(kind))
                    else {
                        return (i, self.error_at(at));
                    };
                    i += 1;
                    if !matches!(
                        value.kind,
                        TokenKind::Field
                            | TokenKind::String
                            | TokenKind::Integer
                            | TokenKind::Decimal
                            | TokenKind::Null
                    ) {
                        return (i, self.error_at(at));
                    }
                    last = Some(Expression::binary(op, left, Expression::Token(value.clone())));
                }

                TokenKind::And | TokenKind::Or => {
                    let op = if token.kind == TokenKind::And {
                        BinaryOp::And
                    } else {
                        BinaryOp::Or
                    };
                    let (next, rest) = self.expression(i + 1);
                    return match (last, rest) {
                        (Some(left), Some(right)) => (next, Some(Expression::binary(op, left, right))),
                        _ => (next, self.error_at(at)),
                    };
                }

                TokenKind::Not => {
                    let (next, rest) = self.expression(i + 1);
                    return match rest {
                        Some(operand) => (next, Some(Expression::unary(UnaryOp::Not, operand))),
                        None => (next, self.error_at(at)),
                    };
                }

                TokenKind::IsNull | TokenKind::IsNotNull => {
                    let op = if token.kind == TokenKind::IsNull {
                        UnaryOp::IsNull
                    } else {
                        UnaryOp::IsNotNull
                    };
                    i += 1;
                    let Some(operand) = last.take() else {
                        return (i, self.error_at(at));
                    };
                    last = Some(Expression::unary(op, operand));
                }

                TokenKind::Is => {
                    i += 1;
                    let Some(operand) = last.take() else {
                        return (i, self.error_at(at));
                    };
                    let kinds = (
                        tokens.get(i).map(|t| t.kind),
                        tokens.get(i + 1).map(|t| t.kind),
                    );
                    let op = match kinds {
                        (Some(TokenKind::Null), _) => {
                            i += 1;
                            UnaryOp::IsNull
                        }
                        (Some(TokenKind::Not), Some(TokenKind::Null)) => {
                            i += 2;
                            UnaryOp::IsNotNull
                        }
                        _ => return (i, self.error_at(at)),
                    };
                    last = Some(Expression::unary(op, operand));
                }

                _ => return (i, self.error_at(at)),
            }
        }

        (tokens.len(), last)
    }

    /// Parenthesised item list starting at `i`; a trailing comma is allowed
    fn list(&mut self, mut i: usize) -> Option<(usize, Vec<Expression>)> {
        let tokens = self.tokens;
        if tokens.get(i)?.kind != TokenKind::ParenLeft {
            return None;
        }

        let mut items = Vec::new();
        i += 1;
        while i < tokens.len() {
            match tokens[i].kind {
                TokenKind::ParenRight => return Some((i + 1, items)),
                TokenKind::Comma => i += 1,
                _ => {
                    let (next, item) = self.expression(i);
                    i = next;
                    items.push(item?);
                }
            }
        }
        None
    }
}

fn is_bound(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Field | TokenKind::String | TokenKind::Integer | TokenKind::Decimal
    )
}

/// Parse a token sequence; empty input yields an error node at offset 0
pub fn parse_tokens(tokens: &[Token]) -> Expression {
    parse_with(&mut Parser::new(tokens))
}

fn parse_with(parser: &mut Parser<'_>) -> Expression {
    let start = match parser.tokens.first() {
        Some(token) if token.kind == TokenKind::Where => 1,
        _ => 0,
    };

    let (next, expression) = parser.expression(start);
    match expression {
        Some(error @ Expression::Error { .. }) => error,
        _ if next < parser.tokens.len() => Expression::Error {
            offset: parser.offset_at(next),
        },
        Some(expression) => expression,
        None => Expression::Error {
            offset: parser.offset_at(start),
        },
    }
}

/// Scan and parse filter text, leaving any error node in the tree
pub fn parse_where(text: &str) -> Expression {
    parse_tokens(&scan(text))
}

/// Scan and parse filter text, rejecting filters that contain an error node
pub fn compile_filter(text: &str) -> Result<Expression, FilterError> {
    if text.len() > MAX_QUERY_LENGTH {
        let error = FilterError::TooLong {
            length: text.len(),
            max: MAX_QUERY_LENGTH,
        };
        log_error!(error.error_code(), "Filter rejected", "error" => &error);
        return Err(error);
    }

    let tokens = scan(text);
    let mut parser = Parser::new(&tokens);
    let expression = parse_with(&mut parser);

    let failure = match (parser.too_deep, expression.first_error()) {
        (Some(offset), _) => Some(FilterError::TooDeep {
            offset,
            max: MAX_EXPRESSION_DEPTH,
        }),
        (None, Some(offset)) => Some(FilterError::Syntax { offset }),
        (None, None) => None,
    };

    if let Some(error) = failure {
        log_error!(error.error_code(), "Filter rejected", "error" => &error, "filter" => text);
        return Err(error);
    }

    log_success!(
        codes::success::FILTER_COMPILED,
        "Filter compiled",
        "expression" => &expression,
        "tokens" => tokens.len()
    );
    Ok(expression)
}
