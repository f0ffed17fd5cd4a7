use super::{Document, Sheet};

const STYLE: &str = r#"
body { font-family: Helvetica, Arial, sans-serif; font-size: 10pt; margin: 1in; }
h1 { font-size: 18pt; margin-bottom: 0.2em; }
h2 { font-size: 12pt; margin-top: 1.5em; }
.generated { color: gray; }
.details td { padding: 1px 8px 1px 0; }
table.sheet { border-collapse: collapse; width: 100%; }
table.sheet th { background: #f0f0f0; border-bottom: 1px solid black; }
table.sheet th, table.sheet td { padding: 4px 6px; text-align: right; }
table.sheet th:first-child, table.sheet td:first-child { text-align: left; }
table.sheet tbody td { border-bottom: 0.5px solid #ccc; }
table.sheet tfoot td { border-top: 1px solid black; }
@media print { section { page-break-inside: avoid; } }
"#;

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn render_sheet(out: &mut String, sheet: &Sheet) {
    out.push_str("<section>\n");
    out.push_str(&format!("<h2>{}</h2>\n", escape(&sheet.name)));
    out.push_str("<table class=\"sheet\">\n<thead><tr>");
    for title in &sheet.header {
        out.push_str(&format!("<th>{}</th>", escape(title)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &sheet.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape(&cell.display())));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n<tfoot><tr>");
    for cell in &sheet.totals {
        out.push_str(&format!("<td><strong>{}</strong></td>", escape(&cell.display())));
    }
    out.push_str("</tr></tfoot>\n</table>\n</section>\n");
}

/// Standalone HTML page for printing: one section per sheet, totals in bold.
pub fn render_html(document: &Document) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&document.title)));
    out.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));
    out.push_str(&format!("<h1>{}</h1>\n", escape(&document.title)));
    out.push_str(&format!(
        "<p class=\"generated\">Generated {}</p>\n",
        escape(&document.generated_date)
    ));
    if !document.details.is_empty() {
        out.push_str("<table class=\"details\">\n");
        for (label, value) in &document.details {
            out.push_str(&format!(
                "<tr><td><strong>{}:</strong></td><td>{}</td></tr>\n",
                escape(label),
                escape(value)
            ));
        }
        out.push_str("</table>\n");
    }
    for sheet in &document.sheets {
        render_sheet(&mut out, sheet);
    }
    out.push_str("</body>\n</html>\n");
    out
}
