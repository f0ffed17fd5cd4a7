use rust_xlsxwriter::{Format, FormatAlign};
use std::path::Path;

use super::{Cell, Workbook};
use crate::error::Result;

const MAX_SHEET_NAME: usize = 31;

/// Excel refuses these characters in sheet names and caps names at 31
/// characters; names must also be unique ignoring case.
fn sheet_name(name: &str, used: &mut Vec<String>) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    let base = if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    };

    let mut candidate: String = base.chars().take(MAX_SHEET_NAME).collect();
    let mut n = 2;
    while used.iter().any(|u| u.eq_ignore_ascii_case(&candidate)) {
        let suffix = format!(" ({n})");
        let head: String = base
            .chars()
            .take(MAX_SHEET_NAME - suffix.chars().count())
            .collect();
        candidate = format!("{}{suffix}", head.trim_end());
        n += 1;
    }
    used.push(candidate.clone());
    candidate
}

/// Write one worksheet per sheet. Headers and the totals row are bold.
pub fn write_xlsx(book: &Workbook, path: &Path) -> Result<()> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let header_fmt = Format::new().set_bold().set_align(FormatAlign::Center);
    let money = Format::new().set_num_format("#,##0.00");
    let bold = Format::new().set_bold();
    let bold_money = Format::new().set_bold().set_num_format("#,##0.00");

    let mut used = Vec::new();
    for sheet in &book.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet_name(&sheet.name, &mut used))?;

        for (col, title) in sheet.header.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, title, &header_fmt)?;
        }

        let last = sheet.rows.len();
        for (idx, row) in sheet.data_rows().enumerate() {
            let row_num = (idx + 1) as u32;
            let is_totals = idx == last;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match (cell, is_totals) {
                    (Cell::Text(s), false) => {
                        worksheet.write_string(row_num, col, s)?;
                    }
                    (Cell::Text(s), true) => {
                        worksheet.write_string_with_format(row_num, col, s, &bold)?;
                    }
                    (Cell::Number(n), false) => {
                        worksheet.write_number_with_format(row_num, col, *n, &money)?;
                    }
                    (Cell::Number(n), true) => {
                        worksheet.write_number_with_format(row_num, col, *n, &bold_money)?;
                    }
                    (Cell::Quantity(q), false) => {
                        worksheet.write_number(row_num, col, *q)?;
                    }
                    (Cell::Quantity(q), true) => {
                        worksheet.write_number_with_format(row_num, col, *q, &bold)?;
                    }
                }
            }
        }
        worksheet.autofit();
    }

    workbook.save(path)?;
    Ok(())
}
