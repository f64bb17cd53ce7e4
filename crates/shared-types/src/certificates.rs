use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::null_as_default;

// ---------------------------------------------------------------------------
// Certificate status
// ---------------------------------------------------------------------------

/// Days before expiry that count as "in scadenza".
pub const EXPIRING_WINDOW_DAYS: i64 = 30;

/// Computed certificate state exposed by the backend views as `cert_stato`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CertStatus {
    Esente,
    Assente,
    Scaduto,
    InScadenza,
    Ok,
}

impl CertStatus {
    /// Order used by the status filter chips.
    pub const ALL: [CertStatus; 5] = [
        CertStatus::Ok,
        CertStatus::InScadenza,
        CertStatus::Scaduto,
        CertStatus::Assente,
        CertStatus::Esente,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Esente => "ESENTE",
            Self::Assente => "ASSENTE",
            Self::Scaduto => "SCADUTO",
            Self::InScadenza => "IN_SCADENZA",
            Self::Ok => "OK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Esente => "Esente",
            Self::Assente => "Assente",
            Self::Scaduto => "Scaduto",
            Self::InScadenza => "In scadenza",
            Self::Ok => "OK",
        }
    }

    /// Same rule the backend views apply.
    pub fn from_days(esente: bool, giorni_rimanenti: Option<i64>) -> Self {
        if esente {
            return Self::Esente;
        }
        match giorni_rimanenti {
            None => Self::Assente,
            Some(d) if d < 0 => Self::Scaduto,
            Some(d) if d <= EXPIRING_WINDOW_DAYS => Self::InScadenza,
            Some(_) => Self::Ok,
        }
    }
}

/// Days between `today` and an expiry date; negative once expired.
pub fn days_remaining(scadenza: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    scadenza.map(|d| (d - today).num_days())
}

// ---------------------------------------------------------------------------
// v_cert_scadenze
// ---------------------------------------------------------------------------

/// Course reference embedded in certificate rows as `corsi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub id: i64,
    pub nome: String,
}

/// Row of the `v_cert_scadenze` view, used by the dashboard and the
/// certificates page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertRow {
    pub person_id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub ruolo: Option<String>,
    #[serde(default)]
    pub nr_quota: Option<i64>,
    #[serde(default)]
    pub nr_tessera: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub consenso_whatsapp: Option<bool>,
    #[serde(default)]
    pub scadenza: Option<NaiveDate>,
    /// `dd/mm/yyyy`, formatted by the view.
    #[serde(default)]
    pub scadenza_fmt: Option<String>,
    #[serde(default)]
    pub giorni_rimanenti: Option<i64>,
    #[serde(default)]
    pub cert_stato: Option<CertStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub corsi: Vec<CourseRef>,
}

impl CertRow {
    /// Course names joined for display and export.
    pub fn corsi_joined(&self) -> String {
        self.corsi
            .iter()
            .map(|c| c.nome.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ---------------------------------------------------------------------------
// Chips
// ---------------------------------------------------------------------------

/// Colour of a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChipTone {
    Danger,
    Warn,
    Info,
    Ok,
    Muted,
}

impl ChipTone {
    pub fn as_class(&self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Ok => "ok",
            Self::Muted => "muted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertChip {
    pub tone: ChipTone,
    pub text: String,
}

impl CertChip {
    fn new(tone: ChipTone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }

    /// Dashboard wording.
    pub fn dashboard(giorni_rimanenti: Option<i64>) -> Self {
        match giorni_rimanenti {
            None => Self::new(ChipTone::Danger, "❌ Assente"),
            Some(d) if d < 0 => Self::new(ChipTone::Danger, format!("🔴 Scaduto ({} gg)", d)),
            Some(d) if d <= 7 => Self::new(ChipTone::Warn, format!("🟡 Scade tra {} gg", d)),
            Some(d) if d <= 30 => Self::new(ChipTone::Info, format!("🔵 Scade tra {} gg", d)),
            Some(_) => Self::new(ChipTone::Ok, "✅ OK"),
        }
    }

    /// Compact wording of the certificates list.
    pub fn compact(giorni_rimanenti: Option<i64>) -> Self {
        match giorni_rimanenti {
            None => Self::new(ChipTone::Muted, "—"),
            Some(d) if d < 0 => Self::new(ChipTone::Danger, format!("SCADUTO ({})", d)),
            Some(d) if d <= 7 => Self::new(ChipTone::Warn, format!("{} gg", d)),
            Some(d) if d <= 30 => Self::new(ChipTone::Info, format!("{} gg", d)),
            Some(_) => Self::new(ChipTone::Ok, "OK"),
        }
    }
}

// ---------------------------------------------------------------------------
// KPI
// ---------------------------------------------------------------------------

/// Dashboard KPI buckets. DUE30 includes DUE7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KpiKey {
    Missing,
    Expired,
    Due7,
    Due30,
}

impl KpiKey {
    pub const ALL: [KpiKey; 4] = [KpiKey::Missing, KpiKey::Expired, KpiKey::Due7, KpiKey::Due30];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Missing => "Assenti",
            Self::Expired => "Scaduti",
            Self::Due7 => "Entro 7 gg",
            Self::Due30 => "Entro 30 gg",
        }
    }

    pub fn tone(&self) -> ChipTone {
        match self {
            Self::Missing | Self::Expired => ChipTone::Danger,
            Self::Due7 => ChipTone::Warn,
            Self::Due30 => ChipTone::Info,
        }
    }

    pub fn matches(&self, giorni_rimanenti: Option<i64>) -> bool {
        match (self, giorni_rimanenti) {
            (Self::Missing, None) => true,
            (Self::Expired, Some(d)) => d < 0,
            (Self::Due7, Some(d)) => (0..=7).contains(&d),
            (Self::Due30, Some(d)) => (0..=30).contains(&d),
            _ => false,
        }
    }

    /// Clicking the active key clears it; clicking another replaces it.
    pub fn toggle(active: Option<KpiKey>, clicked: KpiKey) -> Option<KpiKey> {
        if active == Some(clicked) {
            None
        } else {
            Some(clicked)
        }
    }
}

/// Counts per KPI over the full row set, independent of search and paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KpiTally {
    pub missing: usize,
    pub expired: usize,
    pub due7: usize,
    pub due30: usize,
}

impl KpiTally {
    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        days.into_iter().fold(Self::default(), |mut tally, d| {
            if KpiKey::Missing.matches(d) {
                tally.missing += 1;
            }
            if KpiKey::Expired.matches(d) {
                tally.expired += 1;
            }
            if KpiKey::Due7.matches(d) {
                tally.due7 += 1;
            }
            if KpiKey::Due30.matches(d) {
                tally.due30 += 1;
            }
            tally
        })
    }

    pub fn from_rows(rows: &[CertRow]) -> Self {
        Self::from_days(rows.iter().map(|r| r.giorni_rimanenti))
    }

    pub fn get(&self, key: KpiKey) -> usize {
        match key {
            KpiKey::Missing => self.missing,
            KpiKey::Expired => self.expired,
            KpiKey::Due7 => self.due7,
            KpiKey::Due30 => self.due30,
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sortable columns of the certificates list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertSortKey {
    DisplayName,
    Scadenza,
    GiorniRimanenti,
}

impl CertSortKey {
    pub fn column(&self) -> &'static str {
        match self {
            Self::DisplayName => "display_name",
            Self::Scadenza => "scadenza",
            Self::GiorniRimanenti => "giorni_rimanenti",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Self::DisplayName => "Socio",
            Self::Scadenza => "Scadenza",
            Self::GiorniRimanenti => "Giorni",
        }
    }
}

/// Column sort state: same column flips direction, a new column starts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: CertSortKey,
    pub ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: CertSortKey::GiorniRimanenti,
            ascending: true,
        }
    }
}

impl SortState {
    pub fn toggle(self, key: CertSortKey) -> Self {
        if self.key == key {
            Self {
                key,
                ascending: !self.ascending,
            }
        } else {
            Self {
                key,
                ascending: true,
            }
        }
    }

    /// Header arrow for a column, empty when it is not the sort column.
    pub fn indicator(&self, key: CertSortKey) -> &'static str {
        match (self.key == key, self.ascending) {
            (false, _) => "",
            (true, true) => " ▲",
            (true, false) => " ▼",
        }
    }
}

/// Query for one page of the certificates list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CertQuery {
    pub q: String,
    pub sort: SortState,
    pub only_expired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kpi_toggle_replaces_never_compounds() {
        let active = KpiKey::toggle(None, KpiKey::Expired);
        assert_eq!(active, Some(KpiKey::Expired));
        let active = KpiKey::toggle(active, KpiKey::Due7);
        assert_eq!(active, Some(KpiKey::Due7));
        let active = KpiKey::toggle(active, KpiKey::Due7);
        assert_eq!(active, None);
    }

    #[test]
    fn kpi_buckets_follow_day_ranges() {
        let days = [None, Some(-3), Some(0), Some(7), Some(8), Some(30), Some(31)];
        let tally = KpiTally::from_days(days);
        assert_eq!(
            tally,
            KpiTally {
                missing: 1,
                expired: 1,
                due7: 2,
                due30: 4,
            }
        );
        assert_eq!(tally.get(KpiKey::Due30), 4);
    }

    #[test]
    fn status_from_days() {
        assert_eq!(CertStatus::from_days(true, None), CertStatus::Esente);
        assert_eq!(CertStatus::from_days(false, None), CertStatus::Assente);
        assert_eq!(CertStatus::from_days(false, Some(-1)), CertStatus::Scaduto);
        assert_eq!(CertStatus::from_days(false, Some(0)), CertStatus::InScadenza);
        assert_eq!(CertStatus::from_days(false, Some(30)), CertStatus::InScadenza);
        assert_eq!(CertStatus::from_days(false, Some(31)), CertStatus::Ok);
    }

    #[test]
    fn dashboard_chip_wording() {
        assert_eq!(CertChip::dashboard(None).text, "❌ Assente");
        assert_eq!(CertChip::dashboard(Some(-4)).text, "🔴 Scaduto (-4 gg)");
        assert_eq!(CertChip::dashboard(Some(5)).tone, ChipTone::Warn);
        assert_eq!(CertChip::dashboard(Some(20)).text, "🔵 Scade tra 20 gg");
        assert_eq!(CertChip::dashboard(Some(90)).text, "✅ OK");
    }

    #[test]
    fn compact_chip_wording() {
        assert_eq!(CertChip::compact(None).text, "—");
        assert_eq!(CertChip::compact(Some(-2)).text, "SCADUTO (-2)");
        assert_eq!(CertChip::compact(Some(7)).tone, ChipTone::Warn);
        assert_eq!(CertChip::compact(Some(8)).tone, ChipTone::Info);
        assert_eq!(CertChip::compact(Some(31)).text, "OK");
    }

    #[test]
    fn sort_toggle_rules() {
        let sort = SortState::default();
        let sort = sort.toggle(CertSortKey::GiorniRimanenti);
        assert!(!sort.ascending);
        let sort = sort.toggle(CertSortKey::DisplayName);
        assert_eq!(sort.key, CertSortKey::DisplayName);
        assert!(sort.ascending);
        assert_eq!(sort.indicator(CertSortKey::DisplayName), " ▲");
        assert_eq!(sort.indicator(CertSortKey::Scadenza), "");
    }

    #[test]
    fn cert_row_parses_view_json() {
        let json = r#"{
            "person_id": "7f1d2c36-8c1b-4b2e-9d5e-3b8d1c1a2f10",
            "display_name": "ROSSI MARIA",
            "scadenza": "2026-02-14",
            "scadenza_fmt": "14/02/2026",
            "giorni_rimanenti": 12,
            "cert_stato": "IN_SCADENZA",
            "corsi": [{"id": 1, "nome": "Salsa"}, {"id": 2, "nome": "Bachata"}]
        }"#;
        let row: CertRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.corsi_joined(), "Salsa, Bachata");
        assert_eq!(row.cert_stato, Some(CertStatus::InScadenza));
        assert_eq!(row.nr_quota, None);
    }

    #[test]
    fn days_remaining_is_signed() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(days_remaining(NaiveDate::from_ymd_opt(2026, 1, 5), today), Some(-5));
        assert_eq!(days_remaining(None, today), None);
    }
}
