//! Spreadsheet and JSON downloads.

use base64::Engine;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use shared_types::{AppError, BackupDump, Cell, ExportFile, ExportSheet, JSON_MIME, XLSX_MIME};

fn xlsx_error(err: XlsxError) -> AppError {
    AppError::internal(format!("Generazione Excel fallita: {err}"))
}

/// Render one sheet to xlsx bytes: bold header row, numbers as numbers,
/// empty cells left blank.
pub fn write_xlsx(sheet: &ExportSheet) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name).map_err(xlsx_error)?;

    for (col, title) in sheet.headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, title, &header)
            .map_err(xlsx_error)?;
    }
    for (i, row) in sheet.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let c = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) => {
                    worksheet.write_string(r, c, text).map_err(xlsx_error)?;
                }
                Cell::Int(n) => {
                    worksheet.write_number(r, c, *n as f64).map_err(xlsx_error)?;
                }
            }
        }
    }
    worksheet.set_freeze_panes(1, 0).map_err(xlsx_error)?;
    worksheet.autofit();

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// An xlsx download of `sheet`.
pub fn xlsx_file(filename: String, sheet: &ExportSheet) -> Result<ExportFile, AppError> {
    let bytes = write_xlsx(sheet)?;
    tracing::info!(%filename, rows = sheet.rows.len(), bytes = bytes.len(), "xlsx export built");
    Ok(ExportFile {
        filename,
        mime: XLSX_MIME.to_string(),
        base64: encode(&bytes),
    })
}

/// A pretty-printed JSON download of a backup.
pub fn backup_file(filename: String, dump: &BackupDump) -> Result<ExportFile, AppError> {
    let json = serde_json::to_vec_pretty(dump).map_err(|e| AppError::internal(e.to_string()))?;
    Ok(ExportFile {
        filename,
        mime: JSON_MIME.to_string(),
        base64: encode(&json),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> ExportSheet {
        let mut sheet = ExportSheet::new("Soci", &["nome", "quota"]);
        sheet.push(vec![Cell::Text("ROSSI MARIA".to_string()), Cell::Int(43)]);
        sheet.push(vec![Cell::Text("VERDI ANNA".to_string()), Cell::Empty]);
        sheet
    }

    #[test]
    fn xlsx_is_a_zip_container() {
        let bytes = write_xlsx(&sheet()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn invalid_sheet_name_is_an_error() {
        let bad = ExportSheet::new("Soci[1]", &["nome"]);
        assert!(write_xlsx(&bad).is_err());
    }

    #[test]
    fn xlsx_file_is_base64() {
        let file = xlsx_file("topdance_soci_2026-10-19.xlsx".to_string(), &sheet()).unwrap();
        assert_eq!(file.mime, XLSX_MIME);
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&file.base64)
            .unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn backup_file_round_trips() {
        let dump = BackupDump {
            exported_at: "2026-10-19T09:00:00Z".to_string(),
            people: vec![serde_json::json!({"id": "p1", "display_name": "ROSSI"})],
            contacts: vec![],
            memberships: vec![],
            certificates: vec![],
            courses: vec![],
            person_courses: vec![],
        };
        let file = backup_file("b.json".to_string(), &dump).unwrap();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&file.base64)
            .unwrap();
        let back: BackupDump = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, dump);
    }
}
