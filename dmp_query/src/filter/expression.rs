use super::tokens::{Token, TokenKind};
use serde::Serialize;
use std::fmt;

/// Binary operators; `And` and `Or` connect sub-expressions, the rest
/// compare a field with a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Like => BinaryOp::Like,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Like => "like",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    pub fn is_comparison(&self) -> bool {
        !matches!(self, BinaryOp::Like | BinaryOp::And | BinaryOp::Or)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    Not,
    /// Property missing or empty
    IsNull,
    /// Property present and non-empty
    IsNotNull,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "not",
            UnaryOp::IsNull => "isnull",
            UnaryOp::IsNotNull => "isnotnull",
        }
    }
}

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Token(Token),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    In {
        left: Box<Expression>,
        items: Vec<Expression>,
    },
    Between {
        test: Box<Expression>,
        begin: Box<Expression>,
        end: Box<Expression>,
    },
    /// Parse failure at a byte offset in the filter text; never matches
    Error { offset: usize },
}

impl Expression {
    pub fn token(kind: TokenKind, text: &str) -> Self {
        Expression::Token(Token::new(kind, 0, text))
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Expression::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn between(test: Expression, begin: Expression, end: Expression) -> Self {
        Expression::Between {
            test: Box::new(test),
            begin: Box::new(begin),
            end: Box::new(end),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Expression::Error { .. })
    }

    /// Offset of the leftmost error node anywhere in the tree
    pub fn first_error(&self) -> Option<usize> {
        match self {
            Expression::Token(_) => None,
            Expression::Error { offset } => Some(*offset),
            Expression::Binary { left, right, .. } => {
                left.first_error().or_else(|| right.first_error())
            }
            Expression::Unary { operand, .. } => operand.first_error(),
            Expression::In { left, items } => left
                .first_error()
                .or_else(|| items.iter().find_map(Expression::first_error)),
            Expression::Between { test, begin, end } => test
                .first_error()
                .or_else(|| begin.first_error())
                .or_else(|| end.first_error()),
        }
    }
}

fn write_token(f: &mut fmt::Formatter<'_>, token: &Token) -> fmt::Result {
    match token.kind {
        TokenKind::String => write!(f, "'{}'", token.text),
        _ if token.text.is_empty() => f.write_str(token.kind.as_str()),
        _ => f.write_str(&token.text),
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Token(token) => write_token(f, token),
            Expression::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            Expression::Unary {
                op: UnaryOp::Not,
                operand,
            } => write!(f, "(not {})", operand),
            Expression::Unary { op, operand } => write!(f, "({} {})", operand, op.as_str()),
            Expression::In { left, items } => {
                write!(f, "({} in (", left)?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("))")
            }
            Expression::Between { test, begin, end } => {
                write!(f, "({} between {} and {})", test, begin, end)
            }
            Expression::Error { offset } => write!(f, "error@{}", offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Expression {
        Expression::token(TokenKind::Field, name)
    }

    fn string(text: &str) -> Expression {
        Expression::token(TokenKind::String, text)
    }

    #[test]
    fn test_render_nested() {
        let expression = Expression::binary(
            BinaryOp::And,
            Expression::between(field("X"), string("A"), string("B")),
            Expression::binary(BinaryOp::Lt, field("Y"), string("C")),
        );
        assert_eq!(
            expression.to_string(),
            "((X between 'A' and 'B') and (Y < 'C'))"
        );
    }

    #[test]
    fn test_render_unary_and_in() {
        let not_null = Expression::unary(UnaryOp::IsNotNull, field("Alias"));
        assert_eq!(not_null.to_string(), "(Alias isnotnull)");

        let negated = Expression::unary(UnaryOp::Not, field("Foo"));
        assert_eq!(negated.to_string(), "(not Foo)");

        let list = Expression::In {
            left: Box::new(field("X")),
            items: vec![string("A"), Expression::token(TokenKind::Integer, "2")],
        };
        assert_eq!(list.to_string(), "(X in ('A', 2))");
    }

    #[test]
    fn test_first_error_searches_whole_tree() {
        let expression = Expression::binary(
            BinaryOp::Or,
            field("A"),
            Expression::unary(UnaryOp::Not, Expression::Error { offset: 7 }),
        );
        assert_eq!(expression.first_error(), Some(7));
        assert_eq!(field("A").first_error(), None);
    }
}
