//! Matching parsed filters against records
//!
//! Evaluation is pure: the result depends only on the expression and the
//! object, never on earlier evaluations.

use super::expression::{BinaryOp, Expression, UnaryOp};
use super::tokens::{Token, TokenKind};
use dmp_parser::model::Object;
use std::cmp::Ordering;

impl Expression {
    /// Whether `object` satisfies this expression
    pub fn matches(&self, object: &Object) -> bool {
        match self {
            Expression::Token(token) => {
                object.name.contains(&token.text) || object.path.contains(&token.text)
            }
            Expression::Binary { op, left, right } => match op {
                BinaryOp::And => left.matches(object) && right.matches(object),
                BinaryOp::Or => left.matches(object) || right.matches(object),
                BinaryOp::Like => match (left.as_ref(), right.as_ref()) {
                    (Expression::Token(field), Expression::Token(pattern)) => {
                        is_like(property(object, field), &pattern.text)
                    }
                    _ => false,
                },
                _ => match (left.as_ref(), right.as_ref()) {
                    (Expression::Token(field), Expression::Token(literal)) => {
                        compare(*op, property(object, field), literal)
                    }
                    _ => false,
                },
            },
            Expression::Unary { op, operand } => match op {
                UnaryOp::Not => !operand.matches(object),
                UnaryOp::IsNull | UnaryOp::IsNotNull => {
                    let Expression::Token(field) = operand.as_ref() else {
                        return false;
                    };
                    let empty = property(object, field).is_empty();
                    empty == (*op == UnaryOp::IsNull)
                }
            },
            Expression::In { left, items } => {
                let Expression::Token(field) = left.as_ref() else {
                    return false;
                };
                if field.kind != TokenKind::Field {
                    return false;
                }
                let value = property(object, field);
                items
                    .iter()
                    .any(|item| matches!(item, Expression::Token(t) if t.text == value))
            }
            Expression::Between { test, begin, end } => {
                match (test.as_ref(), begin.as_ref(), end.as_ref()) {
                    (Expression::Token(field), Expression::Token(low), Expression::Token(high)) => {
                        in_range(property(object, field), low, high)
                    }
                    _ => false,
                }
            }
            Expression::Error { .. } => false,
        }
    }
}

/// Property named by a field token; missing properties read as empty
fn property<'o>(object: &'o Object, field: &Token) -> &'o str {
    object.property(&field.text).unwrap_or("")
}

fn relate<T: PartialOrd>(op: BinaryOp, left: T, right: T) -> bool {
    match op {
        BinaryOp::Eq => left == right,
        BinaryOp::Ne => left != right,
        BinaryOp::Lt => left < right,
        BinaryOp::Le => left <= right,
        BinaryOp::Gt => left > right,
        BinaryOp::Ge => left >= right,
        BinaryOp::Like | BinaryOp::And | BinaryOp::Or => false,
    }
}

/// Apply a comparison operator between a property value and a literal.
///
/// A numeric literal compares numerically. When the property does not
/// parse as that number type only its first byte is compared against `'0'`.
fn compare(op: BinaryOp, value: &str, literal: &Token) -> bool {
    match literal.kind {
        TokenKind::Decimal => match literal.text.parse::<f32>() {
            Ok(wanted) => match value.parse::<f32>() {
                Ok(actual) => relate(op, actual, wanted),
                Err(_) => relate(op, first_byte(value), b'0'),
            },
            Err(_) => relate(op, value, literal.text.as_str()),
        },
        TokenKind::Integer => match literal.text.parse::<i64>() {
            Ok(wanted) => match value.parse::<i64>() {
                Ok(actual) => relate(op, actual, wanted),
                Err(_) => relate(op, first_byte(value), b'0'),
            },
            Err(_) => relate(op, value, literal.text.as_str()),
        },
        TokenKind::Null => relate(op, value, ""),
        _ => relate(op, value, literal.text.as_str()),
    }
}

fn first_byte(value: &str) -> u8 {
    value.bytes().next().unwrap_or(0)
}

/// Inclusive range test; integer when both bounds are integers, decimal
/// when both are numeric, lexical otherwise
fn in_range(value: &str, low: &Token, high: &Token) -> bool {
    if low.kind == TokenKind::Integer && high.kind == TokenKind::Integer {
        if let (Ok(low), Ok(high)) = (low.text.parse::<i64>(), high.text.parse::<i64>()) {
            return value
                .parse::<i64>()
                .map(|actual| low <= actual && actual <= high)
                .unwrap_or(false);
        }
    }

    if low.kind.is_numeric() && high.kind.is_numeric() {
        if let (Ok(low), Ok(high)) = (low.text.parse::<f32>(), high.text.parse::<f32>()) {
            return value
                .parse::<f32>()
                .map(|actual| low <= actual && actual <= high)
                .unwrap_or(false);
        }
    }

    low.text.as_str().cmp(value) != Ordering::Greater
        && value.cmp(high.text.as_str()) != Ordering::Greater
}

/// Case-insensitive SQL-style `%` wildcard match.
///
/// The text before the first `%` must prefix the subject; each later
/// segment is found in order in what remains, and the final segment must
/// consume the subject to its end unless the pattern ends in `%`.
pub fn is_like(subject: &str, pattern: &str) -> bool {
    if pattern == "%" {
        return true;
    }

    let subject = subject.to_lowercase();
    let pattern = pattern.to_lowercase();
    if !pattern.contains('%') {
        return subject == pattern;
    }

    let mut segments = pattern.split('%');
    let mut rest = subject.as_str();

    if let Some(head) = segments.next() {
        if !head.is_empty() {
            match rest.strip_prefix(head) {
                Some(remaining) => rest = remaining,
                None => return false,
            }
        }
    }

    let mut segments = segments.peekable();
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            if segments.peek().is_none() {
                return true;
            }
            continue;
        }
        match rest.find(segment) {
            Some(index) => rest = &rest[index + segment.len()..],
            None => return false,
        }
    }

    rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::parser::parse_where;

    fn object(pairs: &[(&str, &str)]) -> Object {
        let mut object = Object::new("AHU-1", "\\\\SITE\\CX1\\AHU-1".to_string(), String::new());
        for (key, value) in pairs {
            object.set_property(key, value);
        }
        object
    }

    fn matches(filter: &str, object: &Object) -> bool {
        parse_where(filter).matches(object)
    }

    #[test]
    fn test_is_like() {
        let cases = [
            ("xxx", "%", true),
            ("xxxABC", "%abc", true),
            ("ABCxxx", "abc%", true),
            ("xxxABCxxx", "%abc%", true),
            ("xxx", "abc", false),
            ("ABCxxx", "%abc", false),
            ("xxxABC", "abc%", false),
            ("xxxABC", "abc", false),
            ("ABCDEF", "abc%def", true),
            ("ABCxxxDEF", "abc%def", true),
            ("xxABCxxxDEFxx", "%abc%def%", true),
            ("xxABxCxxxDEFxx", "%abc%def%", false),
            ("", "%%", true),
        ];

        for (subject, pattern, expected) in cases {
            assert_eq!(is_like(subject, pattern), expected, "{:?} like {:?}", subject, pattern);
        }
    }

    #[test]
    fn test_bare_word_searches_name_and_path() {
        let ahu = object(&[]);
        assert!(matches("AHU", &ahu));
        assert!(matches("CX1", &ahu));
        assert!(!matches("VAV", &ahu));
    }

    #[test]
    fn test_string_comparisons() {
        let ahu = object(&[("Type", "AnalogInput")]);
        assert!(matches("Type = 'AnalogInput'", &ahu));
        assert!(matches("Type != 'AnalogOutput'", &ahu));
        assert!(matches("Type < 'B'", &ahu));
        assert!(!matches("Type >= 'B'", &ahu));
        assert!(matches("Missing = NULL", &ahu));
        assert!(!matches("Type = NULL", &ahu));
    }

    #[test]
    fn test_numeric_comparisons() {
        let point = object(&[("Value", "42"), ("Setpoint", "21.5")]);
        assert!(matches("Value > 9", &point));
        assert!(matches("Value = 42", &point));
        assert!(matches("Value >= -3", &point));
        assert!(matches("Setpoint < 22.0", &point));
        assert!(matches("Setpoint > 2.15e1", &point) == false);
        assert!(matches("Setpoint >= 2.15e1", &point));
    }

    #[test]
    fn test_unparsable_numbers_compare_first_byte_with_zero() {
        let point = object(&[("Value", "abc"), ("Other", "-x")]);
        // 'a' > '0'
        assert!(matches("Value > 1000", &point));
        assert!(!matches("Value < 1000", &point));
        // '-' < '0'
        assert!(matches("Other < 1.5", &point));
        // empty property sorts below '0'
        assert!(matches("Missing < 5", &point));
    }

    #[test]
    fn test_like_and_in() {
        let ahu = object(&[("Type", "AnalogInput")]);
        assert!(matches("Type LIKE 'analog%'", &ahu));
        assert!(matches("Type LIKE %input", &ahu));
        assert!(!matches("Type LIKE 'digital%'", &ahu));

        assert!(matches("Type IN ('BinaryInput', 'AnalogInput')", &ahu));
        assert!(!matches("Type IN ('A', 'B', 'C')", &ahu));
        assert!(matches("Missing IN ('')", &ahu));
        assert!(!matches("Missing IN ('AnalogInput')", &ahu));
        assert!(!matches("'Type' IN ('AnalogInput')", &ahu));
    }

    #[test]
    fn test_in_matches_any_item() {
        let filter = parse_where("X IN ('A','B','C')");
        for value in ["A", "B", "C"] {
            assert!(filter.matches(&object(&[("X", value)])));
        }
        assert!(!filter.matches(&object(&[("X", "D")])));
    }

    #[test]
    fn test_between() {
        let point = object(&[("Value", "15"), ("Temp", "20.5"), ("Code", "M")]);
        assert!(matches("Value BETWEEN 10 AND 20", &point));
        assert!(matches("Value BETWEEN 15 AND 15", &point));
        assert!(!matches("Value BETWEEN 16 AND 20", &point));
        assert!(matches("Temp BETWEEN 20 AND 20.5", &point));
        assert!(!matches("Temp BETWEEN 1 AND 20", &point));
        assert!(matches("Code BETWEEN 'A' AND 'Z'", &point));
        assert!(!matches("Code BETWEEN 'N' AND 'Z'", &point));
    }

    #[test]
    fn test_null_tests_and_not() {
        let ahu = object(&[("Alias", "Main"), ("Blank", "")]);
        assert!(matches("Alias ISNOTNULL", &ahu));
        assert!(matches("Blank IS NULL", &ahu));
        assert!(matches("Missing ISNULL", &ahu));
        assert!(matches("NOT Alias ISNULL", &ahu));
        assert!(!matches("NOT AHU", &ahu));
    }

    #[test]
    fn test_connectives_and_errors() {
        let ahu = object(&[("Type", "AnalogInput"), ("Value", "3")]);
        assert!(matches("Type = 'AnalogInput' AND Value < 5", &ahu));
        assert!(matches("Type = 'X' OR Value < 5", &ahu));
        assert!(!matches("Type = 'X' AND Value < 5", &ahu));
        assert!(!matches("Type = ", &ahu));
        assert!(!matches("", &ahu));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let ahu = object(&[("Type", "AnalogInput")]);
        let filter = parse_where("Type LIKE '%input' AND NOT Name = 'VAV'");
        let first = filter.matches(&ahu);
        assert_eq!(filter.matches(&ahu), first);
        assert!(first);
    }
}
