//! Line-level helpers shared by the parsing scopes

/// Split `Key: Value` on the first colon, trimming surrounding spaces.
/// A line without a colon yields an empty value.
pub fn split_key_value(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((key, value)) => (key.trim_matches(' '), value.trim_matches(' ')),
        None => (line.trim_matches(' '), ""),
    }
}

/// Split a dictionary line into trimmed `:`-delimited cells
pub fn split_cells(line: &str) -> Vec<&str> {
    line.split(':').map(str::trim).collect()
}

/// Halve each run of consecutive blank lines, rounding down.
///
/// ByteCode sections are exported with each blank line doubled, so a lone
/// blank line is an artifact and is dropped.
pub fn fix_double_blank_lines(lines: Vec<String>) -> Vec<String> {
    let mut run = 0usize;
    lines
        .into_iter()
        .filter(|line| {
            if line.is_empty() {
                run += 1;
                run % 2 == 0
            } else {
                run = 0;
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value("Type : AnalogIn"), ("Type", "AnalogIn"));
        assert_eq!(split_key_value("EndObject"), ("EndObject", ""));
        assert_eq!(
            split_key_value("LastChange : 1/2/2006 3:04:05 PM"),
            ("LastChange", "1/2/2006 3:04:05 PM")
        );
        assert_eq!(split_key_value(""), ("", ""));
    }

    #[test]
    fn test_split_cells() {
        assert_eq!(
            split_cells("'TYPE : NAME :VALUE"),
            vec!["'TYPE", "NAME", "VALUE"]
        );
        assert_eq!(split_cells("single"), vec!["single"]);
    }

    #[test]
    fn test_doubled_blank_lines_are_halved() {
        let fixed = fix_double_blank_lines(owned(&["a", "", "", "b", "", "", "", "", "c"]));
        assert_eq!(fixed, owned(&["a", "", "b", "", "", "c"]));
    }

    #[test]
    fn test_single_blank_and_odd_runs() {
        let fixed = fix_double_blank_lines(owned(&["a", "", "b", "", "", ""]));
        assert_eq!(fixed, owned(&["a", "b", ""]));

        let fixed = fix_double_blank_lines(owned(&["", "x", "", "", "", "", ""]));
        assert_eq!(fixed, owned(&["x", "", ""]));
    }

    #[test]
    fn test_no_blank_lines_unchanged() {
        let lines = owned(&["Numeric X", "X = 1"]);
        assert_eq!(fix_double_blank_lines(lines.clone()), lines);
    }
}
