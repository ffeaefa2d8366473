use serde::Serialize;
use std::fmt;

/// Token kinds produced by the filter scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Unterminated quoted string
    Unknown,
    /// Number run followed by a character that cannot end a number
    ParseError,
    /// Operator symbols that form no known operator
    OpError,

    // === LITERALS ===
    Field,
    String,
    Integer,
    Decimal,
    Pattern,

    // === PUNCTUATION ===
    Comma,
    ParenLeft,
    ParenRight,

    // === COMPARISON OPERATORS ===
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    // === KEYWORDS ===
    Like,
    Not,
    And,
    Or,
    In,
    Is,
    IsNull,
    IsNotNull,
    Null,
    Where,
    Between,
    Select,
    Order,
    By,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Unknown => "unknown",
            TokenKind::ParseError => "parse_error",
            TokenKind::OpError => "op_error",
            TokenKind::Field => "field",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Pattern => "pattern",
            TokenKind::Comma => ",",
            TokenKind::ParenLeft => "(",
            TokenKind::ParenRight => ")",
            TokenKind::Eq => "=",
            TokenKind::Ne => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Like => "like",
            TokenKind::Not => "not",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::In => "in",
            TokenKind::Is => "is",
            TokenKind::IsNull => "isnull",
            TokenKind::IsNotNull => "isnotnull",
            TokenKind::Null => "null",
            TokenKind::Where => "where",
            TokenKind::Between => "between",
            TokenKind::Select => "select",
            TokenKind::Order => "order",
            TokenKind::By => "by",
        }
    }

    /// Tokens that can stand as an operand on their own
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::Field
                | TokenKind::String
                | TokenKind::Integer
                | TokenKind::Decimal
                | TokenKind::Pattern
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TokenKind::Integer | TokenKind::Decimal)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look up a reserved word, case-insensitively
pub fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "like" => TokenKind::Like,
        "not" => TokenKind::Not,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "in" => TokenKind::In,
        "where" => TokenKind::Where,
        "select" => TokenKind::Select,
        "between" => TokenKind::Between,
        "null" => TokenKind::Null,
        "order" => TokenKind::Order,
        "by" => TokenKind::By,
        "is" => TokenKind::Is,
        "isnull" => TokenKind::IsNull,
        "isnotnull" => TokenKind::IsNotNull,
        _ => return None,
    };
    Some(kind)
}

/// Look up a run of operator symbols
pub fn operator(symbol: &str) -> Option<TokenKind> {
    let kind = match symbol {
        "=" | "==" => TokenKind::Eq,
        "!=" | "<>" => TokenKind::Ne,
        "<" => TokenKind::Lt,
        "<=" => TokenKind::Le,
        ">" => TokenKind::Gt,
        ">=" => TokenKind::Ge,
        _ => return None,
    };
    Some(kind)
}

/// One scanned token
///
/// Keyword and punctuation tokens carry no text. Quoted strings carry their
/// contents without the quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character in the filter text
    pub offset: usize,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, offset: usize, text: &str) -> Self {
        Self {
            kind,
            offset,
            text: text.to_string(),
        }
    }

    /// Token without source text, such as a keyword or a parenthesis
    pub fn bare(kind: TokenKind, offset: usize) -> Self {
        Self::new(kind, offset, "")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.text)
        }
    }
}
