use serde::Serialize;
use std::path::Path;
use std::process::Command;

use crate::error::{DashboardError, Result};
use crate::export::{Document, Sheet};

/// Embedded Typst template for the billing summary document.
/// Uses a placeholder that gets replaced with the JSON file name.
const DOCUMENT_TEMPLATE: &str = r##"// Billing Summary Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  flipped: true,
  margin: (top: 0.75in, bottom: 0.75in, left: 0.75in, right: 0.75in),
)

#set text(font: "Helvetica", size: 9pt)

#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 18pt, weight: "bold")[#data.title]
  ],
  [
    #text(size: 10pt, fill: gray)[Generated #data.generated_date]
  ]
)

#if data.details.len() > 0 [
  #v(0.5em)
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (right, left),
    inset: 2pt,
    ..data.details.map(d => ([*#d.at(0):*], d.at(1))).flatten()
  )
]

#v(0.5em)
#line(length: 100%, stroke: 0.5pt + gray)

#for sheet in data.sheets [
  #v(1em)
  #text(weight: "bold", size: 11pt)[#sheet.name]
  #v(0.3em)
  #table(
    columns: sheet.header.len(),
    align: (x, y) => if x == 0 { left } else { right },
    stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else { (bottom: 0.5pt + gray) },
    inset: 5pt,
    fill: (x, y) => if y == 0 { luma(240) } else { none },

    ..sheet.header.map(h => [*#h*]),
    ..sheet.rows.flatten(),
    ..sheet.totals.map(t => [*#t*]),
  )
]
"##;

/// What the template reads: every cell already formatted for display.
#[derive(Debug, Serialize)]
struct PdfSheet<'a> {
    name: &'a str,
    header: &'a [String],
    rows: Vec<Vec<String>>,
    totals: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PdfData<'a> {
    title: &'a str,
    generated_date: &'a str,
    details: &'a [(String, String)],
    sheets: Vec<PdfSheet<'a>>,
}

impl<'a> PdfSheet<'a> {
    fn from_sheet(sheet: &'a Sheet) -> Self {
        Self {
            name: &sheet.name,
            header: &sheet.header,
            rows: sheet
                .rows
                .iter()
                .map(|row| row.iter().map(|c| c.display()).collect())
                .collect(),
            totals: sheet.totals.iter().map(|c| c.display()).collect(),
        }
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        DashboardError::PdfGeneration(format!("path is not valid UTF-8: {}", path.display()))
    })
}

/// Generate PDF using Typst CLI
pub fn generate_pdf(document: &Document, output_path: &Path) -> Result<()> {
    // Check if typst is available
    if Command::new("typst").arg("--version").output().is_err() {
        return Err(DashboardError::TypstNotFound);
    }

    let temp_dir = std::env::temp_dir().join("billdash");
    std::fs::create_dir_all(&temp_dir)?;

    let data = PdfData {
        title: &document.title,
        generated_date: &document.generated_date,
        details: &document.details,
        sheets: document.sheets.iter().map(PdfSheet::from_sheet).collect(),
    };
    let json_data =
        serde_json::to_string(&data).map_err(|e| DashboardError::PdfGeneration(e.to_string()))?;

    let json_path = temp_dir.join("document.json");
    std::fs::write(&json_path, &json_data)?;

    // data.json sits next to the template, so a relative path works under --root
    let template_content = DOCUMENT_TEMPLATE.replace("DATA_JSON_PATH", "document.json");
    let template_path = temp_dir.join("document.typ");
    std::fs::write(&template_path, &template_content)?;

    let output = Command::new("typst")
        .args([
            "compile",
            "--root",
            path_arg(&temp_dir)?,
            path_arg(&template_path)?,
            path_arg(output_path)?,
        ])
        .output()?;

    // Clean up temp files
    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DashboardError::PdfGeneration(stderr.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Cell, Workbook};

    #[test]
    fn template_data_is_preformatted() {
        let sheet = Sheet {
            name: "Scheme Wise Summary".into(),
            header: vec!["Scheme".into(), "Quantity".into(), "Total Amount".into()],
            rows: vec![vec![Cell::text("A"), Cell::Quantity(2.5), Cell::Number(12345.0)]],
            totals: vec![Cell::text("Total"), Cell::Quantity(2.5), Cell::Number(12345.0)],
        };
        let document = Document::new("Billing Summary", Workbook { sheets: vec![sheet] });
        let data = PdfData {
            title: &document.title,
            generated_date: &document.generated_date,
            details: &document.details,
            sheets: document.sheets.iter().map(PdfSheet::from_sheet).collect(),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["sheets"][0]["rows"][0][2], "12,345.00");
        assert_eq!(json["sheets"][0]["totals"][1], "2.5");
    }

    #[test]
    fn template_placeholder_is_replaced() {
        let rendered = DOCUMENT_TEMPLATE.replace("DATA_JSON_PATH", "document.json");
        assert!(rendered.contains("json(\"document.json\")"));
        assert!(!rendered.contains("DATA_JSON_PATH"));
    }
}
