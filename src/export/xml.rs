use crate::export::escape_markup;
use crate::models::UserRecord;

/// Render records as `<users><user>...</user></users>`, omitting null fields.
pub fn render(records: &[UserRecord]) -> String {
    let mut lines = vec![
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>".to_string(),
        "<users>".to_string(),
    ];

    for record in records {
        lines.push("  <user>".to_string());
        for (column, cell) in UserRecord::COLUMNS.iter().zip(record.cells()) {
            if cell.is_null() {
                continue;
            }
            lines.push(format!(
                "    <{0}>{1}</{0}>",
                column,
                escape_markup(&cell.as_text())
            ));
        }
        lines.push("  </user>".to_string());
    }
    lines.push("</users>".to_string());

    lines.join("\n")
}
