//! Display helpers shared by the list pages.

use chrono::NaiveDate;
use shared_types::Ruolo;

/// Placeholder for a missing value.
pub const DASH: &str = "—";

pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DASH.to_string(),
    }
}

/// WhatsApp consent column: "Sì", "No" or a dash.
pub fn consent_label(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "Sì",
        Some(false) => "No",
        None => DASH,
    }
}

/// Human role name; unknown database values are shown as stored.
pub fn ruolo_label(value: Option<&str>) -> String {
    match value {
        Some(raw) => Ruolo::try_from(raw)
            .map(|r| r.label().to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => DASH.to_string(),
    }
}

pub fn quota_label(value: Option<i64>) -> String {
    value.map(|n| n.to_string()).unwrap_or_else(|| DASH.to_string())
}

/// `dd/mm/yyyy`, the format the backend views use.
pub fn date_it(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| DASH.to_string())
}

/// Phone and email on one line, skipping whichever is missing.
pub fn contacts_line(telefono: Option<&str>, email: Option<&str>) -> String {
    let parts: Vec<&str> = [telefono, email]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        DASH.to_string()
    } else {
        parts.join(" • ")
    }
}
