//! Flatten a snapshot into the text shown by the view.
//!
//! The projection is one-way: the display text is never parsed back into
//! records.

use crate::store::TodoSnapshot;

/// Render `snapshot` as a leading newline followed by one line per record:
/// the id, then each field value, separated by single spaces.
///
/// An empty snapshot renders as just `"\n"`.
pub fn render_snapshot(snapshot: &TodoSnapshot) -> String {
    let mut out = String::from("\n");
    for record in &snapshot.records {
        out.push_str(&record.id.to_string());
        for value in record.fields.display_values() {
            out.push(' ');
            out.push_str(value);
        }
        out.push('\n');
    }
    out
}
