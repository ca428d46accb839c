use crate::cleaning::FlatTable;
use crate::errors::StorageError;
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::Value;

/// Renders the cleaned table as a single-sheet workbook.
pub fn write_flat_table_xlsx(table: &FlatTable) -> Result<Vec<u8>, StorageError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name("Listings")
        .map_err(|e| StorageError::Xlsx(format!("Failed to name worksheet: {}", e)))?;

    // Headers
    for (col, header) in table.columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(|e| {
                StorageError::Xlsx(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, record) in table.records.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, column) in table.columns.iter().enumerate() {
            if let Some(value) = record.get(column) {
                write_cell(worksheet, r, col as u16, value).map_err(|e| {
                    StorageError::Xlsx(format!("Failed to write {column} (row {r}): {e}"))
                })?;
            }
        }
    }

    workbook
        .save_to_buffer()
        .map_err(|e| StorageError::Xlsx(format!("Failed to save workbook: {}", e)))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    match value {
        Value::Null => {}
        Value::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Value::Number(n) => match n.as_f64() {
            Some(f) => {
                worksheet.write_number(row, col, f)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string())?;
            }
        },
        Value::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        // arrays (and anything normalize left nested) go in as compact JSON
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}
