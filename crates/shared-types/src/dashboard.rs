use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::certificates::{CertRow, KpiKey, KpiTally};
use crate::common::Pager;
use crate::search::SearchTerm;

/// Dashboard row ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashSort {
    /// Accent and case insensitive name order.
    #[default]
    Name,
    /// Days remaining ascending, missing dates last, name as tiebreak.
    Expiry,
}

impl DashSort {
    /// Text of the toggle button, naming the order it switches to.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Name => "Ordina per scadenza",
            Self::Expiry => "Ordine alfabetico",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Name => Self::Expiry,
            Self::Expiry => Self::Name,
        }
    }
}

/// Client-side state of the dashboard: the loaded rows plus search, KPI
/// filter, sort and pager. Every mutation keeps the pager in sync with the
/// filtered count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    rows: Vec<CertRow>,
    query: String,
    kpi: Option<KpiKey>,
    sort: DashSort,
    pager: Pager,
    load_failed: bool,
}

impl DashboardView {
    pub fn new(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            ..Self::default()
        }
    }

    /// View rebuilt from the state a client sends with an export request.
    pub fn restored(rows: Vec<CertRow>, query: &str, kpi: Option<KpiKey>, sort: DashSort) -> Self {
        let mut view = Self::new(crate::common::DEFAULT_PAGE_SIZE);
        view.set_rows(rows);
        view.set_query(query);
        view.kpi = kpi;
        view.sort = sort;
        view.sync();
        view
    }

    pub fn rows(&self) -> &[CertRow] {
        &self.rows
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn kpi(&self) -> Option<KpiKey> {
        self.kpi
    }

    pub fn sort(&self) -> DashSort {
        self.sort
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Replace the loaded rows and return to the first page.
    pub fn set_rows(&mut self, rows: Vec<CertRow>) {
        self.rows = rows;
        self.load_failed = false;
        self.pager.reset();
        self.sync();
    }

    /// The last load failed. Rows from an earlier load stay visible.
    pub fn fail_load(&mut self) {
        self.load_failed = true;
    }

    /// Message for the table body when there are no rows to show.
    pub fn body_message(&self, loading: bool) -> Option<&'static str> {
        if loading && self.rows.is_empty() {
            Some("Carico…")
        } else if self.load_failed && self.rows.is_empty() {
            Some("Errore.")
        } else if self.page_rows().is_empty() {
            Some("Nessun risultato.")
        } else {
            None
        }
    }

    /// Whether the last load failed.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.pager.reset();
        self.sync();
    }

    pub fn click_kpi(&mut self, key: KpiKey) {
        self.kpi = KpiKey::toggle(self.kpi, key);
        self.pager.reset();
        self.sync();
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
        self.pager.reset();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pager.set_page_size(page_size);
        self.sync();
    }

    pub fn next_page(&mut self) {
        self.pager.next();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev();
    }

    /// "Aggiorna": clear search, KPI and sort before reloading.
    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.kpi = None;
        self.sort = DashSort::Name;
        self.pager.reset();
        self.sync();
    }

    /// KPI counts over every loaded row.
    pub fn tally(&self) -> KpiTally {
        KpiTally::from_rows(&self.rows)
    }

    /// Rows passing the KPI filter and the search, in display order.
    pub fn filtered(&self) -> Vec<&CertRow> {
        let term = SearchTerm::parse(&self.query);
        let mut out: Vec<&CertRow> = self
            .rows
            .iter()
            .filter(|r| self.kpi.is_none_or(|k| k.matches(r.giorni_rimanenti)))
            .filter(|r| {
                term.as_ref().is_none_or(|t| {
                    t.matches_row(&r.display_name, r.nr_tessera.as_deref(), r.nr_quota)
                })
            })
            .collect();
        match self.sort {
            DashSort::Name => out.sort_by(|a, b| compare_names(&a.display_name, &b.display_name)),
            DashSort::Expiry => out.sort_by(|a, b| compare_expiry(a, b)),
        }
        out
    }

    /// The slice of `filtered()` on the current page.
    pub fn page_rows(&self) -> Vec<&CertRow> {
        let filtered = self.filtered();
        let window = self.pager.window();
        filtered
            .into_iter()
            .skip(window.start)
            .take(window.len())
            .collect()
    }

    /// "Risultati shown / all".
    pub fn counts(&self) -> (usize, usize) {
        (self.filtered().len(), self.rows.len())
    }

    fn sync(&mut self) {
        let total = self.filtered().len();
        self.pager.set_total(total);
    }
}

/// Compare two names ignoring case and common Latin accents.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    fold_name(a).cmp(&fold_name(b))
}

fn compare_expiry(a: &CertRow, b: &CertRow) -> Ordering {
    match (a.giorni_rimanenti, b.giorni_rimanenti) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| compare_names(&a.display_name, &b.display_name))
}

/// Lowercase with accents stripped, for base-letter comparison.
pub fn fold_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
