use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::certificates::CertRow;
use crate::people::PersonSearchRow;

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const JSON_MIME: &str = "application/json;charset=utf-8";

/// A generated file handed to the browser for download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFile {
    pub filename: String,
    pub mime: String,
    /// Standard base64 of the file bytes.
    pub base64: String,
}

/// One spreadsheet cell. `Empty` is written as a blank cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        value.map(|s| Cell::Text(s.to_string())).unwrap_or(Cell::Empty)
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map(Cell::Int).unwrap_or(Cell::Empty)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }
}

/// A flat worksheet: header row plus data rows of equal width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ExportSheet {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

fn consent_cell(value: Option<bool>) -> Cell {
    match value {
        Some(true) => Cell::Text("Sì".to_string()),
        Some(false) => Cell::Text("No".to_string()),
        None => Cell::Empty,
    }
}

/// Dashboard export: the filtered set in display order.
pub fn dashboard_sheet<'a, I>(rows: I) -> ExportSheet
where
    I: IntoIterator<Item = &'a CertRow>,
{
    let mut sheet = ExportSheet::new(
        "Dashboard",
        &["quota", "nome", "tessera", "scadenza", "giorni", "corsi"],
    );
    for r in rows {
        sheet.push(vec![
            r.nr_quota.into(),
            Cell::Text(r.display_name.clone()),
            r.nr_tessera.as_deref().into(),
            r.scadenza_fmt.as_deref().into(),
            r.giorni_rimanenti.into(),
            r.corsi_joined().into(),
        ]);
    }
    sheet
}

pub fn certificates_sheet<'a, I>(rows: I) -> ExportSheet
where
    I: IntoIterator<Item = &'a CertRow>,
{
    let mut sheet = ExportSheet::new(
        "Certificati",
        &[
            "nome", "ruolo", "quota", "tessera", "telefono", "email", "scadenza", "giorni", "stato",
            "corsi",
        ],
    );
    for r in rows {
        sheet.push(vec![
            Cell::Text(r.display_name.clone()),
            r.ruolo.as_deref().into(),
            r.nr_quota.into(),
            r.nr_tessera.as_deref().into(),
            r.telefono.as_deref().into(),
            r.email.as_deref().into(),
            r.scadenza_fmt.as_deref().into(),
            r.giorni_rimanenti.into(),
            r.cert_stato.map(|s| s.as_db_str()).into(),
            r.corsi_joined().into(),
        ]);
    }
    sheet
}

/// People export; `course_names` resolves `course_ids` to names.
pub fn people_sheet<'a, I>(rows: I, course_names: &HashMap<i64, String>) -> ExportSheet
where
    I: IntoIterator<Item = &'a PersonSearchRow>,
{
    let mut sheet = ExportSheet::new(
        "Soci",
        &[
            "nome", "quota", "ruolo", "corso", "tessera", "telefono", "email", "consenso_whatsapp",
            "scadenza", "giorni", "stato", "corsi",
        ],
    );
    for r in rows {
        let corsi = r
            .course_ids
            .iter()
            .filter_map(|id| course_names.get(id).map(String::as_str))
            .collect::<Vec<_>>()
            .join(", ");
        sheet.push(vec![
            Cell::Text(r.display_name.clone()),
            r.nr_quota.into(),
            r.ruolo.as_deref().into(),
            r.corso.as_deref().into(),
            r.nr_tessera.as_deref().into(),
            r.telefono.as_deref().into(),
            r.email.as_deref().into(),
            consent_cell(r.consenso_whatsapp),
            r.scadenza.map(|d| d.format("%d/%m/%Y").to_string()).into(),
            r.giorni_rimanenti.into(),
            r.cert_stato.map(|s| s.as_db_str()).into(),
            corsi.into(),
        ]);
    }
    sheet
}

pub fn dashboard_filename(today: NaiveDate) -> String {
    format!("topdance_controllo_certificati_{}.xlsx", today.format("%Y-%m-%d"))
}

pub fn certificates_filename(today: NaiveDate) -> String {
    format!("topdance_certificati_{}.xlsx", today.format("%Y-%m-%d"))
}

pub fn people_filename(today: NaiveDate) -> String {
    format!("topdance_soci_{}.xlsx", today.format("%Y-%m-%d"))
}

pub fn backup_filename(at: NaiveDateTime) -> String {
    format!("topdance_backup_{}.json", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Full database dump. Rows are kept as raw JSON so every column survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDump {
    pub exported_at: String,
    pub people: Vec<serde_json::Value>,
    pub contacts: Vec<serde_json::Value>,
    pub memberships: Vec<serde_json::Value>,
    pub certificates: Vec<serde_json::Value>,
    pub courses: Vec<serde_json::Value>,
    pub person_courses: Vec<serde_json::Value>,
}
