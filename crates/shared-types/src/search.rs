use serde::{Deserialize, Serialize};

use crate::certificates::CertStatus;
use crate::people::Ruolo;

/// A normalised search term: trimmed, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    text: String,
}

impl SearchTerm {
    /// `None` when the input is blank after trimming, or holds nothing but
    /// characters the backend filter grammar drops.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim();
        if text.chars().all(|c| c.is_whitespace() || is_filter_syntax(c)) {
            None
        } else {
            Some(Self {
                text: text.to_string(),
            })
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lowered(&self) -> String {
        self.text.to_lowercase()
    }

    /// The membership number this term names, if it is made of digits only.
    pub fn quota(&self) -> Option<i64> {
        if self.text.chars().all(|c| c.is_ascii_digit()) {
            self.text.parse().ok()
        } else {
            None
        }
    }

    /// Case-insensitive substring pattern for a backend `ilike` filter.
    ///
    /// PostgREST treats `*` as the wildcard; characters that would break the
    /// filter grammar are dropped.
    pub fn ilike_pattern(&self) -> String {
        let cleaned: String = self
            .text
            .chars()
            .filter(|c| !is_filter_syntax(*c))
            .collect();
        format!("*{}*", cleaned)
    }

    /// Local match used by the dashboard over already-loaded rows.
    pub fn matches_row(&self, display_name: &str, nr_tessera: Option<&str>, nr_quota: Option<i64>) -> bool {
        let needle = self.lowered();
        let name = display_name.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.to_lowercase().contains(&needle) {
            return true;
        }
        if nr_tessera.is_some_and(|t| t.to_lowercase().contains(&needle)) {
            return true;
        }
        nr_quota.is_some_and(|q| q.to_string().contains(&needle))
    }
}

fn is_filter_syntax(c: char) -> bool {
    matches!(c, ',' | '(' | ')' | '*' | '%')
}

/// Backend filters of the people list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeopleFilter {
    #[serde(default)]
    pub q: String,
    /// OR-composed certificate states; empty means any.
    #[serde(default)]
    pub statuses: Vec<CertStatus>,
    #[serde(default)]
    pub ruolo: Option<Ruolo>,
    /// People enrolled in at least one of these courses.
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

impl PeopleFilter {
    pub fn term(&self) -> Option<SearchTerm> {
        SearchTerm::parse(&self.q)
    }

    pub fn is_empty(&self) -> bool {
        self.term().is_none() && self.statuses.is_empty() && self.ruolo.is_none() && self.course_ids.is_empty()
    }

    /// Add or remove a status chip.
    pub fn toggle_status(&mut self, status: CertStatus) {
        if let Some(pos) = self.statuses.iter().position(|s| *s == status) {
            self.statuses.remove(pos);
        } else {
            self.statuses.push(status);
        }
    }

    pub fn toggle_course(&mut self, course_id: i64) {
        if let Some(pos) = self.course_ids.iter().position(|&id| id == course_id) {
            self.course_ids.remove(pos);
        } else {
            self.course_ids.push(course_id);
        }
    }
}
