use crate::export::escape_markup;
use crate::models::UserRecord;

/// Render records as a bare HTML table.
pub fn render(records: &[UserRecord]) -> String {
    let mut output = String::from("<table class=\"dataframe\">\n  <thead>\n    <tr>\n");
    for column in UserRecord::COLUMNS {
        output.push_str(&format!("      <th>{}</th>\n", column));
    }
    output.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for record in records {
        output.push_str("    <tr>\n");
        for cell in record.cells() {
            output.push_str(&format!("      <td>{}</td>\n", escape_markup(&cell.as_text())));
        }
        output.push_str("    </tr>\n");
    }

    output.push_str("  </tbody>\n</table>\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_table_structure() {
        let output = render(&fixtures::records());

        assert!(output.starts_with("<table"));
        assert!(output.trim_end().ends_with("</table>"));
        assert_eq!(output.matches("<th>").count(), UserRecord::COLUMNS.len());
        assert_eq!(output.matches("<tr>").count(), 3);
        assert!(output.contains("<td>cats, &quot;naps&quot; &amp; &lt;treats&gt;</td>"));
        assert!(output.contains("<td>kitten_daily</td>"));
    }
}
