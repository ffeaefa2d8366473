//! Filter text scanner
//!
//! Classifies each byte through a fixed table and reads maximal runs of one
//! class as a token. Bytes outside every class are skipped.

use super::tokens::{keyword, operator, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Other,
    Space,
    Digit,
    /// Non-letter characters allowed inside words: `.` `_` `@` `&`
    Alpha,
    Lower,
    Upper,
    Operator,
    QuoteSingle,
    QuoteDouble,
    ParenOpen,
    ParenClose,
    Comma,
    Symbol,
}

const fn build_class_table() -> [CharClass; 256] {
    let mut table = [CharClass::Other; 256];

    table[b' ' as usize] = CharClass::Space;
    table[b'\n' as usize] = CharClass::Space;
    table[b'\r' as usize] = CharClass::Space;
    table[b'\t' as usize] = CharClass::Space;

    table[b'!' as usize] = CharClass::Operator;
    table[b'<' as usize] = CharClass::Operator;
    table[b'=' as usize] = CharClass::Operator;
    table[b'>' as usize] = CharClass::Operator;

    table[b'(' as usize] = CharClass::ParenOpen;
    table[b')' as usize] = CharClass::ParenClose;
    table[b',' as usize] = CharClass::Comma;

    table[b'/' as usize] = CharClass::Symbol;
    table[b'*' as usize] = CharClass::Symbol;
    table[b'%' as usize] = CharClass::Symbol;
    table[b'+' as usize] = CharClass::Symbol;
    table[b'-' as usize] = CharClass::Symbol;
    table[b'|' as usize] = CharClass::Symbol;

    table[b'.' as usize] = CharClass::Alpha;
    table[b'_' as usize] = CharClass::Alpha;
    table[b'@' as usize] = CharClass::Alpha;
    table[b'&' as usize] = CharClass::Alpha;

    table[b'"' as usize] = CharClass::QuoteDouble;
    table[b'\'' as usize] = CharClass::QuoteSingle;

    let mut c = b'0';
    while c <= b'9' {
        table[c as usize] = CharClass::Digit;
        c += 1;
    }

    let mut c = b'A';
    while c <= b'Z' {
        table[c as usize] = CharClass::Upper;
        table[(c + 32) as usize] = CharClass::Lower;
        c += 1;
    }

    table
}

static CLASSES: [CharClass; 256] = build_class_table();

fn class(byte: u8) -> CharClass {
    CLASSES[byte as usize]
}

fn is_word(byte: u8) -> bool {
    matches!(
        class(byte),
        CharClass::Alpha | CharClass::Lower | CharClass::Upper
    )
}

fn is_digit(byte: u8) -> bool {
    class(byte) == CharClass::Digit
}

fn is_space(byte: u8) -> bool {
    class(byte) == CharClass::Space
}

/// Split filter text into tokens
pub fn scan(input: &str) -> Vec<Token> {
    let data = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let (consumed, token) = match class(data[i]) {
            CharClass::Space => {
                i += skip_space(&data[i..]);
                continue;
            }
            CharClass::ParenOpen => (1, Token::bare(TokenKind::ParenLeft, i)),
            CharClass::ParenClose => (1, Token::bare(TokenKind::ParenRight, i)),
            CharClass::Comma => (1, Token::bare(TokenKind::Comma, i)),
            CharClass::Operator => read_operator(input, i),
            CharClass::QuoteSingle | CharClass::QuoteDouble => read_quote(input, i),
            CharClass::Digit => read_number(input, i),
            CharClass::Symbol
                if matches!(data[i], b'-' | b'+')
                    && data.get(i + 1).is_some_and(|&next| is_digit(next)) =>
            {
                read_number(input, i)
            }
            _ => read_word(input, i),
        };

        if consumed == 0 {
            i += 1;
            continue;
        }

        i += consumed;
        tokens.push(token);
    }

    tokens
}

fn skip_space(data: &[u8]) -> usize {
    data.iter().take_while(|&&b| is_space(b)).count()
}

fn count_digits(data: &[u8]) -> usize {
    data.iter().take_while(|&&b| is_digit(b)).count()
}

fn read_operator(input: &str, start: usize) -> (usize, Token) {
    let data = &input.as_bytes()[start..];
    let length = data
        .iter()
        .take_while(|&&b| class(b) == CharClass::Operator)
        .count();
    let symbol = &input[start..start + length];

    let kind = operator(symbol).unwrap_or(TokenKind::OpError);
    (length, Token::new(kind, start, symbol))
}

fn read_quote(input: &str, start: usize) -> (usize, Token) {
    let data = &input.as_bytes()[start..];
    let quote = data[0];

    match data[1..].iter().position(|&b| b == quote) {
        Some(length) => (
            length + 2,
            Token::new(TokenKind::String, start, &input[start + 1..start + 1 + length]),
        ),
        None => (data.len(), Token::bare(TokenKind::Unknown, start)),
    }
}

/// Read an integer or decimal; a letter right after the number turns the
/// whole run into a word
fn read_number(input: &str, start: usize) -> (usize, Token) {
    let data = &input.as_bytes()[start..];
    let mut kind = TokenKind::Integer;
    let mut p = 0;

    if matches!(data[p], b'-' | b'+') {
        p += 1;
    }
    p += count_digits(&data[p..]);

    if p == data.len() || is_space(data[p]) {
        return (p, Token::new(kind, start, &input[start..start + p]));
    }

    if data[p] == b'.' {
        kind = TokenKind::Decimal;
        p += 1;
        p += count_digits(&data[p..]);
    }

    if p < data.len() && matches!(data[p], b'e' | b'E') {
        kind = TokenKind::Decimal;
        p += 1;
        if p < data.len() && matches!(data[p], b'-' | b'+') {
            p += 1;
        }
        p += count_digits(&data[p..]);
        if p < data.len() && data[p] == b'.' {
            p += 1;
            p += count_digits(&data[p..]);
        }
    }

    if p < data.len() {
        match class(data[p]) {
            CharClass::Alpha | CharClass::Lower | CharClass::Upper => {
                return read_word(input, start)
            }
            CharClass::Space
            | CharClass::Operator
            | CharClass::Comma
            | CharClass::ParenClose
            | CharClass::Symbol => {}
            _ => kind = TokenKind::ParseError,
        }
    }

    (p, Token::new(kind, start, &input[start..start + p]))
}

/// Read a field name, keyword, all-digit word or `%` pattern
fn read_word(input: &str, start: usize) -> (usize, Token) {
    let data = &input.as_bytes()[start..];
    let mut kind = TokenKind::Field;
    let mut digits = 0;
    let mut p = 0;

    while p < data.len() {
        let byte = data[p];
        if is_digit(byte) {
            digits += 1;
        } else if byte == b'%' {
            kind = TokenKind::Pattern;
        } else if !is_word(byte) {
            break;
        }
        p += 1;
    }

    if p == 0 {
        return (0, Token::bare(TokenKind::Unknown, start));
    }

    let word = &input[start..start + p];
    if let Some(reserved) = keyword(word) {
        return (p, Token::bare(reserved, start));
    }

    if digits == p {
        kind = TokenKind::Integer;
    }

    (p, Token::new(kind, start, word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_text(input: &str) -> Vec<(TokenKind, String)> {
        scan(input)
            .into_iter()
            .map(|token| (token.kind, token.text))
            .collect()
    }

    fn expect(pairs: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
        pairs
            .iter()
            .map(|(kind, text)| (*kind, text.to_string()))
            .collect()
    }

    #[test]
    fn test_scan_comparisons() {
        let cases = [
            ("name = 'John'", TokenKind::Eq, "="),
            ("name == 'John'", TokenKind::Eq, "=="),
            ("name != 'John'", TokenKind::Ne, "!="),
            ("name <> 'John'", TokenKind::Ne, "<>"),
            ("name > 'John'", TokenKind::Gt, ">"),
            ("name < 'John'", TokenKind::Lt, "<"),
            ("name >= 'John'", TokenKind::Ge, ">="),
            ("name <= 'John'", TokenKind::Le, "<="),
            ("name like 'John'", TokenKind::Like, ""),
        ];

        for (input, op, text) in cases {
            assert_eq!(
                kinds_and_text(input),
                expect(&[
                    (TokenKind::Field, "name"),
                    (op, text),
                    (TokenKind::String, "John")
                ]),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_scan_in_list() {
        assert_eq!(
            kinds_and_text(" X IN ( 'A', 'B', 'C' ) "),
            expect(&[
                (TokenKind::Field, "X"),
                (TokenKind::In, ""),
                (TokenKind::ParenLeft, ""),
                (TokenKind::String, "A"),
                (TokenKind::Comma, ""),
                (TokenKind::String, "B"),
                (TokenKind::Comma, ""),
                (TokenKind::String, "C"),
                (TokenKind::ParenRight, ""),
            ])
        );
    }

    #[test]
    fn test_scan_between_and() {
        assert_eq!(
            kinds_and_text(" X BETWEEN 'A' AND 'B' AND Y < 'C'"),
            expect(&[
                (TokenKind::Field, "X"),
                (TokenKind::Between, ""),
                (TokenKind::String, "A"),
                (TokenKind::And, ""),
                (TokenKind::String, "B"),
                (TokenKind::And, ""),
                (TokenKind::Field, "Y"),
                (TokenKind::Lt, "<"),
                (TokenKind::String, "C"),
            ])
        );
    }

    #[test]
    fn test_scan_numbers() {
        let cases: [(&str, &[TokenKind]); 7] = [
            ("123", &[TokenKind::Integer]),
            ("123.0", &[TokenKind::Decimal]),
            ("123e123", &[TokenKind::Decimal]),
            ("123.013e13", &[TokenKind::Decimal]),
            ("123.013e13>123", &[TokenKind::Decimal, TokenKind::Gt, TokenKind::Integer]),
            ("123.013e13AAA", &[TokenKind::Field]),
            ("123 AAA", &[TokenKind::Integer, TokenKind::Field]),
        ];

        for (input, kinds) in cases {
            let scanned: Vec<TokenKind> = scan(input).into_iter().map(|t| t.kind).collect();
            assert_eq!(scanned, kinds, "input {:?}", input);
        }
    }

    #[test]
    fn test_read_number() {
        let cases = [
            ("123", TokenKind::Integer, "123"),
            ("-123", TokenKind::Integer, "-123"),
            ("+123", TokenKind::Integer, "+123"),
            ("123.45", TokenKind::Decimal, "123.45"),
            ("-123.45", TokenKind::Decimal, "-123.45"),
            ("1e10", TokenKind::Decimal, "1e10"),
            ("-1e10", TokenKind::Decimal, "-1e10"),
            ("+1.23e10", TokenKind::Decimal, "+1.23e10"),
            ("123abc", TokenKind::Field, "123abc"),
            ("123+456", TokenKind::Integer, "123"),
            ("123 456", TokenKind::Integer, "123"),
            ("123,456", TokenKind::Integer, "123"),
            ("123@", TokenKind::Field, "123@"),
            ("123'x'", TokenKind::ParseError, "123"),
            ("1e", TokenKind::Decimal, "1e"),
        ];

        for (input, kind, text) in cases {
            let (_, token) = read_number(input, 0);
            assert_eq!((token.kind, token.text.as_str()), (kind, text), "input {:?}", input);
        }
    }

    #[test]
    fn test_signed_numbers_in_filters() {
        assert_eq!(
            kinds_and_text("Value > -5"),
            expect(&[
                (TokenKind::Field, "Value"),
                (TokenKind::Gt, ">"),
                (TokenKind::Integer, "-5"),
            ])
        );
    }

    #[test]
    fn test_quotes_and_errors() {
        assert_eq!(
            kinds_and_text("\"double quoted\""),
            expect(&[(TokenKind::String, "double quoted")])
        );
        assert_eq!(kinds_and_text("'open"), expect(&[(TokenKind::Unknown, "")]));
        assert_eq!(
            kinds_and_text("a =! b"),
            expect(&[
                (TokenKind::Field, "a"),
                (TokenKind::OpError, "=!"),
                (TokenKind::Field, "b"),
            ])
        );
    }

    #[test]
    fn test_patterns_and_word_characters() {
        assert_eq!(
            kinds_and_text("Name LIKE AHU%1 Room_1.Temp@x"),
            expect(&[
                (TokenKind::Field, "Name"),
                (TokenKind::Like, ""),
                (TokenKind::Pattern, "AHU%1"),
                (TokenKind::Field, "Room_1.Temp@x"),
            ])
        );
    }

    #[test]
    fn test_offsets_point_at_token_start() {
        let offsets: Vec<usize> = scan("a = 'b' )").iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 8]);
    }

    #[test]
    fn test_unclassified_bytes_are_skipped() {
        assert_eq!(
            kinds_and_text("* ° Name"),
            expect(&[(TokenKind::Field, "Name")])
        );
    }
}
