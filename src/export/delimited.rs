use std::path::{Path, PathBuf};

use super::{Cell, Workbook};
use crate::error::Result;

fn raw(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => format!("{n:.2}"),
        Cell::Quantity(q) => q.to_string(),
    }
}

/// Write each sheet to `<dir>/<NN>-<slug>.csv`. Returns the files written.
pub fn write_csv_dir(book: &Workbook, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(book.sheets.len());

    for (idx, sheet) in book.sheets.iter().enumerate() {
        let path = dir.join(format!("{:02}-{}.csv", idx + 1, sheet.slug()));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&sheet.header)?;
        for row in sheet.data_rows() {
            writer.write_record(row.iter().map(raw))?;
        }
        writer.flush()?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::Sheet;
    use tempfile::TempDir;

    #[test]
    fn one_file_per_sheet_with_totals_last() {
        let dir = TempDir::new().unwrap();
        let sheet = |name: &str| Sheet {
            name: name.into(),
            header: vec!["Center".into(), "Quantity".into(), "Total Amount".into()],
            rows: vec![
                vec![Cell::text("Rampur, East"), Cell::Quantity(2.5), Cell::Number(10.0)],
                vec![Cell::text("Mau"), Cell::Quantity(1.0), Cell::Number(4.125)],
            ],
            totals: vec![Cell::text("Total"), Cell::Quantity(3.5), Cell::Number(14.125)],
        };
        let book = Workbook {
            sheets: vec![sheet("Center Wise Summary"), sheet("Scheme Wise Summary")],
        };

        let files = write_csv_dir(&book, &dir.path().join("out")).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("01-center-wise-summary.csv"));

        let content = std::fs::read_to_string(&files[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1 + 2 + 1);
        assert_eq!(lines[0], "Center,Quantity,Total Amount");
        assert_eq!(lines[1], "\"Rampur, East\",2.5,10.00");
        assert!(lines[3].starts_with("Total,3.5,"));
    }
}
