//! Natural-sort ordering of result tables
//!
//! Rows are string vectors aligned with a field list. Sort clauses name a
//! field and an optional direction; several clauses form a stable multi-key
//! sort where each key breaks the ties left by the one before it.

use dmp_parser::logging::{codes, Code};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("bad sort direction '{0}'")]
    BadDirection(String),

    #[error("malformed sort clause '{0}'")]
    MalformedClause(String),

    #[error("empty sort clause")]
    EmptyClause,
}

impl OrderingError {
    /// Get the appropriate error code for this error type
    pub fn error_code(&self) -> Code {
        match self {
            OrderingError::UnknownField(_) => codes::query::UNKNOWN_SORT_FIELD,
            OrderingError::BadDirection(_) => codes::query::BAD_SORT_DIRECTION,
            OrderingError::MalformedClause(_) | OrderingError::EmptyClause => {
                codes::query::MALFORMED_SORT_CLAUSE
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    /// Accepts `asc`, the historical `acs` spelling, and `desc`
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "asc" | "acs" => Some(Direction::Ascending),
            "desc" => Some(Direction::Descending),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

/// One resolved sort clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    /// Index of the sorted column in each row
    pub column: usize,
    /// Lower-cased field name
    pub name: String,
    pub direction: Direction,
}

impl SortKey {
    /// Compare two rows on this key's column; a missing cell reads as empty
    pub fn compare(&self, left: &[String], right: &[String]) -> Ordering {
        let a = left.get(self.column).map(String::as_str).unwrap_or("");
        let b = right.get(self.column).map(String::as_str).unwrap_or("");
        compare(a, b, self.direction)
    }
}

/// Natural comparison with a direction applied
pub fn compare(left: &str, right: &str, direction: Direction) -> Ordering {
    direction.apply(compare_natural(left, right))
}

/// Ascending natural comparison
///
/// A leading number, optionally signed, is compared by value, and text that
/// starts with a number sorts before other non-empty text. The remainders are
/// split into alternating digit and non-digit runs which are compared
/// pairwise, digit runs by value and everything else lexically; when one run
/// list is a prefix of the other the shorter sorts first. Values that still
/// tie, such as `AV010` and `AV10`, fall back to plain lexical order.
pub fn compare_natural(left: &str, right: &str) -> Ordering {
    if left == right {
        return Ordering::Equal;
    }

    let (a_number, a_rest) = split_leading_number(left);
    let (b_number, b_rest) = split_leading_number(right);

    let leading = match (a_number, b_number) {
        (Some(a), Some(b)) => compare_signed(a, b),
        (Some(_), None) if right.is_empty() => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) if left.is_empty() => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };

    leading
        .then_with(|| compare_runs(a_rest, b_rest))
        .then_with(|| left.cmp(right))
}

/// Sign flag and digits of a leading number
type LeadingNumber<'a> = (bool, &'a str);

fn split_leading_number(text: &str) -> (Option<LeadingNumber<'_>>, &str) {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = unsigned
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if end == 0 {
        return (None, text);
    }

    (Some((negative, &unsigned[..end])), &unsigned[end..])
}

fn compare_signed(a: LeadingNumber<'_>, b: LeadingNumber<'_>) -> Ordering {
    // -0 is zero
    let a_negative = a.0 && a.1.bytes().any(|d| d != b'0');
    let b_negative = b.0 && b.1.bytes().any(|d| d != b'0');

    match (a_negative, b_negative) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => compare_digit_runs(a.1, b.1),
        (true, true) => compare_digit_runs(b.1, a.1),
    }
}

fn compare_runs(left: &str, right: &str) -> Ordering {
    let a = partition_digits(left);
    let b = partition_digits(right);

    for (x, y) in a.iter().zip(b.iter()) {
        let ordering = if is_digit_run(x) && is_digit_run(y) {
            compare_digit_runs(x, y)
        } else {
            x.cmp(y)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    a.len().cmp(&b.len())
}

fn is_digit_run(run: &str) -> bool {
    run.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

/// Numeric comparison of two digit runs of any length
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Split text into maximal runs of ASCII digits and non-digits, in order.
/// Empty text yields a single empty run.
pub fn partition_digits(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (index, byte) in text.bytes().enumerate() {
        let digit = byte.is_ascii_digit();
        match in_digits {
            Some(previous) if previous != digit => {
                runs.push(&text[start..index]);
                start = index;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }

    runs.push(&text[start..]);
    runs
}

/// Resolve sort clauses against the table's field names
///
/// Each entry may hold several comma-separated clauses. A clause is either a
/// field name or a direction followed by a field name, case-insensitively.
pub fn parse_sort_keys<C, F>(clauses: &[C], fields: &[F]) -> Result<Vec<SortKey>, OrderingError>
where
    C: AsRef<str>,
    F: AsRef<str>,
{
    let lower_fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_lowercase()).collect();
    let mut keys = Vec::new();

    for entry in clauses {
        for clause in entry.as_ref().split(',') {
            let clause = clause.trim().to_lowercase();
            let words: Vec<&str> = clause.split_whitespace().collect();

            let (direction, name) = match words.as_slice() {
                [] => return Err(OrderingError::EmptyClause),
                [name] => (Direction::Ascending, *name),
                [direction, name] => match Direction::from_keyword(direction) {
                    Some(direction) => (direction, *name),
                    None => return Err(OrderingError::BadDirection(direction.to_string())),
                },
                _ => return Err(OrderingError::MalformedClause(clause.clone())),
            };

            let column = lower_fields
                .iter()
                .position(|field| field == name)
                .ok_or_else(|| OrderingError::UnknownField(name.to_string()))?;

            keys.push(SortKey {
                column,
                name: name.to_string(),
                direction,
            });
        }
    }

    Ok(keys)
}

/// Stable sort of rows by already resolved keys
pub fn sort_rows(keys: &[SortKey], rows: &mut [Vec<String>]) {
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// Resolve the clauses and sort the rows; on error the rows are untouched
pub fn reorder<C, F>(clauses: &[C], fields: &[F], rows: &mut [Vec<String>]) -> Result<(), OrderingError>
where
    C: AsRef<str>,
    F: AsRef<str>,
{
    let keys = parse_sort_keys(clauses, fields)?;
    sort_rows(&keys, rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn table(rows: &[[&str; 2]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_partition_digits() {
        let cases: [(&str, &[&str]); 10] = [
            ("abc123def456", &["abc", "123", "def", "456"]),
            ("123abc456", &["123", "abc", "456"]),
            ("abc123", &["abc", "123"]),
            ("123", &["123"]),
            ("abc", &["abc"]),
            ("", &[""]),
            ("123abc456def789", &["123", "abc", "456", "def", "789"]),
            ("abc123def", &["abc", "123", "def"]),
            ("123456", &["123456"]),
            ("abcDEF123", &["abcDEF", "123"]),
        ];

        for (input, expected) in cases {
            assert_eq!(partition_digits(input), expected, "partition of {:?}", input);
        }
    }

    #[test]
    fn test_compare() {
        use Direction::*;
        let cases = [
            ("abc", "abc", Ascending, Ordering::Equal),
            ("abc", "abc", Descending, Ordering::Equal),
            ("abc", "def", Ascending, Ordering::Less),
            ("def", "abc", Ascending, Ordering::Greater),
            ("abc", "def", Descending, Ordering::Greater),
            ("123", "456", Ascending, Ordering::Less),
            ("abc123", "abc456", Ascending, Ordering::Less),
            ("abc", "abc123", Ascending, Ordering::Less),
            ("abc123", "abc", Descending, Ordering::Less),
        ];

        for (a, b, direction, expected) in cases {
            assert_eq!(compare(a, b, direction), expected, "{:?} vs {:?} {:?}", a, b, direction);
        }
    }

    #[test]
    fn test_digit_runs_compare_by_value() {
        assert_eq!(compare_natural("AV9", "AV10"), Ordering::Less);
        assert_eq!(compare_natural("AV010", "AV9"), Ordering::Greater);
        assert_eq!(compare_natural("10", "9"), Ordering::Greater);
        assert_eq!(compare_natural("-5", "3"), Ordering::Less);
        assert_eq!(
            compare_natural("x99999999999999999999999", "x100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_signed_numbers_with_suffixes_sort() {
        let expected = ["-10", "-5", "-4", "-4a", "-3", "-3b"];
        let shuffles = [
            ["-5", "-4", "-4a", "-3", "-3b", "-10"],
            ["-3b", "-4a", "-10", "-3", "-5", "-4"],
            ["-4", "-3b", "-5", "-10", "-4a", "-3"],
        ];

        for shuffle in shuffles {
            let mut rows: Vec<Vec<String>> = shuffle.iter().map(|v| vec![v.to_string()]).collect();
            reorder(&["value"], &["value"], &mut rows).unwrap();
            let sorted: Vec<&str> = rows.iter().map(|row| row[0].as_str()).collect();
            assert_eq!(sorted, expected, "sorting {:?}", shuffle);
        }
    }

    #[test]
    fn test_natural_comparison_is_a_total_order() {
        let values = [
            "", "-10", "-5", "-4", "-4a", "-3", "-3b", "-0", "0", "+5", "5", "05", "9", "10",
            "10a", "-", "-x", "a", "AV9", "AV10", "AV010", "abc", "abc123", "x-1",
        ];

        for a in values {
            assert_eq!(compare_natural(a, a), Ordering::Equal);
            for b in values {
                let forward = compare_natural(a, b);
                assert_eq!(forward, compare_natural(b, a).reverse(), "{:?} vs {:?}", a, b);
                if a != b {
                    assert_ne!(forward, Ordering::Equal, "{:?} vs {:?}", a, b);
                }
                for c in values {
                    if forward == Ordering::Less && compare_natural(b, c) == Ordering::Less {
                        assert_eq!(compare_natural(a, c), Ordering::Less, "{:?} < {:?} < {:?}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_reorder_single_key() {
        let fields = ["id", "name"];
        let mut rows = table(&[["1", "Bob"], ["2", "Alice"], ["3", "Charlie"]]);

        reorder(&["acs name"], &fields, &mut rows).unwrap();
        assert_eq!(rows, table(&[["2", "Alice"], ["1", "Bob"], ["3", "Charlie"]]));

        reorder(&["desc name"], &fields, &mut rows).unwrap();
        assert_eq!(rows, table(&[["3", "Charlie"], ["1", "Bob"], ["2", "Alice"]]));

        reorder(&["ASC Name"], &fields, &mut rows).unwrap();
        assert_eq!(rows, table(&[["2", "Alice"], ["1", "Bob"], ["3", "Charlie"]]));
    }

    #[test]
    fn test_reorder_errors_leave_rows_untouched() {
        let fields = ["id", "name"];
        let original = table(&[["1", "Bob"], ["2", "Alice"], ["3", "Charlie"]]);

        let cases = [
            ("acs unknown", OrderingError::UnknownField("unknown".to_string())),
            ("unknown name", OrderingError::BadDirection("unknown".to_string())),
            (
                "acs name extra",
                OrderingError::MalformedClause("acs name extra".to_string()),
            ),
            ("name,", OrderingError::EmptyClause),
        ];

        for (clause, expected) in cases {
            let mut rows = original.clone();
            assert_eq!(reorder(&[clause], &fields, &mut rows), Err(expected));
            assert_eq!(rows, original);
        }
    }

    #[test]
    fn test_reorder_multiple_keys() {
        let fields = ["id", "name"];
        let mut rows = table(&[["1", "Bob"], ["2", "Alice"], ["3", "Alice"]]);

        reorder(&["acs name", "desc id"], &fields, &mut rows).unwrap();
        assert_eq!(rows, table(&[["3", "Alice"], ["2", "Alice"], ["1", "Bob"]]));

        let mut rows = table(&[["1", "Bob"], ["2", "Alice"], ["3", "Alice"]]);
        reorder(&["name, desc id"], &fields, &mut rows).unwrap();
        assert_eq!(rows, table(&[["3", "Alice"], ["2", "Alice"], ["1", "Bob"]]));
    }

    #[test]
    fn test_sort_is_stable() {
        let fields = ["id", "name"];
        let mut rows = table(&[["b", "Same"], ["a", "Same"], ["c", "Same"]]);
        reorder(&["name"], &fields, &mut rows).unwrap();
        assert_eq!(rows, table(&[["b", "Same"], ["a", "Same"], ["c", "Same"]]));
    }

    #[test]
    fn test_error_codes() {
        assert_matches!(
            parse_sort_keys(&["id"], &["name"]),
            Err(OrderingError::UnknownField(_))
        );
        assert_eq!(
            OrderingError::EmptyClause.error_code(),
            codes::query::MALFORMED_SORT_CLAUSE
        );
    }
}
