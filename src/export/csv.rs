use crate::models::UserRecord;

/// Render records as RFC 4180 CSV with a header row. Nulls become empty cells.
pub fn render(records: &[UserRecord]) -> String {
    let mut output = String::new();

    push_row(&mut output, UserRecord::COLUMNS.iter().map(|c| c.to_string()));
    for record in records {
        push_row(&mut output, record.cells().iter().map(|cell| cell.as_text()));
    }

    output
}

fn push_row(output: &mut String, fields: impl Iterator<Item = String>) {
    let row: Vec<String> = fields.map(|f| quote(&f)).collect();
    output.push_str(&row.join(","));
    output.push('\n');
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_header_and_rows() {
        let output = render(&fixtures::records());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "uid,nickname,signature,avatar_thumb,follower_count,custom_verify,unique_id,sec_uid,follow_status,platform_sync_info,search_keyword"
        );
        assert_eq!(
            lines[1],
            r#"6784563,Cat Lover,"cats, ""naps"" & <treats>","{""uri"":""tos-avatar""}",1200,,catlover,MS4wLjABAAAA,0,,cats"#
        );
        assert_eq!(lines[2], ",,,{},1.2M,,kitten_daily,,,,cats");
    }

    #[test]
    fn test_empty_records_still_have_header() {
        let output = render(&[]);
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_quote_multiline() {
        assert_eq!(quote("line one\nline two"), "\"line one\nline two\"");
        assert_eq!(quote("plain"), "plain");
    }
}
