//! Browser-facing home page.

use crate::store::TodoSnapshot;

/// Render the record set as a minimal HTML table.
pub fn render_home(snapshot: &TodoSnapshot) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Todo</title></head>\n<body>\n\
         <h1>Todo Items</h1>\n",
    );

    if snapshot.is_empty() {
        html.push_str("<p>No todo items.</p>\n");
    } else {
        html.push_str(
            "<table>\n<tr><th>ID</th><th>Label</th><th>Name</th><th>Description</th>\
             <th>Date</th><th>Importance</th></tr>\n",
        );
        for record in &snapshot.records {
            let f = &record.fields;
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                record.id,
                escape_html(f.label.as_deref().unwrap_or("")),
                escape_html(&f.name),
                escape_html(&f.description),
                escape_html(&f.date),
                escape_html(&f.importance),
            ));
        }
        html.push_str("</table>\n");
    }

    html.push_str("<p><a href=\"/v1/all\">JSON</a></p>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
