use serde::Serialize;

/// One entry of an object's `AlarmLinks` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmLink {
    pub id: usize,
    pub path: String,
    pub enabled: bool,
}

/// Decode the captured text of an `AlarmLinks` block.
///
/// Each line is `path : id : state`. The result is indexed by `id - 1` and
/// sized to the highest id seen; ids that never appear stay `None`. Lines
/// with the wrong field count or a non-numeric or zero id are skipped.
pub fn parse_alarm_links(text: &str) -> Vec<Option<AlarmLink>> {
    let mut links: Vec<Option<AlarmLink>> = Vec::new();

    for line in text.lines() {
        let fields: Vec<&str> = line.split(':').map(str::trim).collect();
        let [path, id, state] = fields.as_slice() else {
            continue;
        };

        let id = match id.parse::<usize>() {
            Ok(id) if id > 0 => id,
            _ => continue,
        };

        if links.len() < id {
            links.resize(id, None);
        }

        links[id - 1] = Some(AlarmLink {
            id,
            path: path.to_string(),
            enabled: *state == "Enabled",
        });
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_filled_links() {
        let text = "\\\\SITE\\Alarm1 : 1 : Enabled\n\\\\SITE\\Alarm3 : 3 : Disabled";
        let links = parse_alarm_links(text);

        assert_eq!(links.len(), 3);
        assert_eq!(
            links[0],
            Some(AlarmLink {
                id: 1,
                path: "\\\\SITE\\Alarm1".to_string(),
                enabled: true,
            })
        );
        assert_eq!(links[1], None);
        assert!(!links[2].as_ref().unwrap().enabled);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let text = "no separators\nA : x : Enabled\nB : 0 : Enabled\nC : 2 : Enabled : extra\nD : 2 : enabled";
        let links = parse_alarm_links(text);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0], None);
        let d = links[1].as_ref().unwrap();
        assert_eq!(d.path, "D");
        // state match is exact
        assert!(!d.enabled);
    }

    #[test]
    fn test_later_duplicate_id_wins() {
        let links = parse_alarm_links("A : 1 : Enabled\nB : 1 : Disabled");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_ref().unwrap().path, "B");
    }
}
