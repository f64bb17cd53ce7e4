use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::certificates::CertStatus;
use crate::common::null_as_default;
use crate::error::AppError;

/// Message shown when a person is saved without a name.
pub const DISPLAY_NAME_REQUIRED: &str = "Display name obbligatorio";

// ---------------------------------------------------------------------------
// Ruolo
// ---------------------------------------------------------------------------

/// Role of a person inside the academy, matching the `people.ruolo` CHECK.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ruolo {
    #[default]
    Allievo,
    Collaboratore,
    Altro,
}

impl Ruolo {
    pub const ALL: [Ruolo; 3] = [Ruolo::Allievo, Ruolo::Collaboratore, Ruolo::Altro];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Allievo => "ALLIEVO",
            Self::Collaboratore => "COLLABORATORE",
            Self::Altro => "ALTRO",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Allievo => "Allievo",
            Self::Collaboratore => "Collaboratore",
            Self::Altro => "Altro",
        }
    }
}

impl TryFrom<&str> for Ruolo {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ALLIEVO" => Ok(Self::Allievo),
            "COLLABORATORE" => Ok(Self::Collaboratore),
            "ALTRO" => Ok(Self::Altro),
            _ => Err(format!(
                "Ruolo '{}' non valido. Valori ammessi: ALLIEVO, COLLABORATORE, ALTRO",
                value
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// Row of the `people` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub nr_quota: Option<i64>,
    #[serde(default)]
    pub ruolo: Option<String>,
    #[serde(default)]
    pub corso: Option<String>,
}

/// Row of the `contacts` table (1:1 with a person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub person_id: Uuid,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub codice_fiscale: Option<String>,
    #[serde(default)]
    pub consenso_whatsapp: Option<bool>,
}

/// Row of the `memberships` table (1:1 with a person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub person_id: Uuid,
    #[serde(default)]
    pub nr_tessera: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    /// Safeguarding form received.
    #[serde(default)]
    pub safeguarding: Option<bool>,
    #[serde(default)]
    pub codice_fiscale: Option<String>,
}

/// Row of the `certificates` table (1:1 with a person).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub person_id: Uuid,
    #[serde(default)]
    pub scadenza: Option<NaiveDate>,
    #[serde(default)]
    pub fonte: Option<String>,
    #[serde(default)]
    pub esente: Option<bool>,
}

/// Everything the person editor needs, fetched in one round of parallel reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFull {
    pub person: Person,
    pub contact: Option<Contact>,
    pub membership: Option<Membership>,
    pub certificate: Option<Certificate>,
    #[serde(default)]
    pub course_ids: Vec<i64>,
}

/// Row of the `v_people_search` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSearchRow {
    pub id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub nr_quota: Option<i64>,
    #[serde(default)]
    pub corso: Option<String>,
    #[serde(default)]
    pub ruolo: Option<String>,
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
    #[serde(default)]
    pub giorni_rimanenti: Option<i64>,
    #[serde(default)]
    pub cert_stato: Option<CertStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub course_ids: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Save payloads
// ---------------------------------------------------------------------------

/// Upsert body for `people`. `id` is omitted on create so the backend assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct PersonPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Display name obbligatorio"))
    )]
    pub display_name: String,
    pub nr_quota: Option<i64>,
    pub corso: Option<String>,
    pub ruolo: Ruolo,
}

/// Upsert body for `contacts`; nulls are sent so cleared fields are cleared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<Uuid>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub codice_fiscale: Option<String>,
    pub consenso_whatsapp: Option<bool>,
}

/// Upsert body for `memberships`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MembershipPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<Uuid>,
    pub nr_tessera: Option<String>,
    pub note: Option<String>,
    pub safeguarding: Option<bool>,
}

/// Upsert body for `certificates`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CertificatePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<Uuid>,
    pub scadenza: Option<NaiveDate>,
    pub fonte: Option<String>,
    pub esente: bool,
}

/// A validated person save: the person row, its three 1:1 rows and the
/// desired set of course ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct PersonSave {
    #[cfg_attr(feature = "validation", validate(nested))]
    pub person: PersonPayload,
    pub contact: ContactPayload,
    pub membership: MembershipPayload,
    pub certificate: CertificatePayload,
    pub course_ids: Vec<i64>,
}

impl PersonSave {
    /// Attach the backend-assigned id to the three dependent payloads.
    pub fn for_person(&self, person_id: Uuid) -> (ContactPayload, MembershipPayload, CertificatePayload) {
        (
            ContactPayload {
                person_id: Some(person_id),
                ..self.contact.clone()
            },
            MembershipPayload {
                person_id: Some(person_id),
                ..self.membership.clone()
            },
            CertificatePayload {
                person_id: Some(person_id),
                ..self.certificate.clone()
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Editor form
// ---------------------------------------------------------------------------

/// Raw editor state. Every field is the text the user typed; tri-state
/// selects use `""`, `"true"` and `"false"`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonForm {
    pub display_name: String,
    pub nr_quota: String,
    pub corso: String,
    pub ruolo: String,
    pub telefono: String,
    pub email: String,
    pub codice_fiscale: String,
    pub consenso_whatsapp: String,
    pub nr_tessera: String,
    pub note: String,
    pub safeguarding: String,
    pub scadenza: String,
    pub fonte: String,
    pub esente: bool,
    pub course_ids: Vec<i64>,
}

impl PersonForm {
    /// Blank form for a new person.
    pub fn new() -> Self {
        Self {
            ruolo: Ruolo::default().as_db_str().to_string(),
            ..Self::default()
        }
    }

    /// Hydrate the editor from a loaded person.
    pub fn from_full(full: &PersonFull) -> Self {
        let contact = full.contact.as_ref();
        let membership = full.membership.as_ref();
        let certificate = full.certificate.as_ref();
        Self {
            display_name: full.person.display_name.clone(),
            nr_quota: full.person.nr_quota.map(|n| n.to_string()).unwrap_or_default(),
            corso: full.person.corso.clone().unwrap_or_default(),
            ruolo: full
                .person
                .ruolo
                .clone()
                .unwrap_or_else(|| Ruolo::default().as_db_str().to_string()),
            telefono: contact.and_then(|c| c.telefono.clone()).unwrap_or_default(),
            email: contact.and_then(|c| c.email.clone()).unwrap_or_default(),
            codice_fiscale: contact
                .and_then(|c| c.codice_fiscale.clone())
                .or_else(|| membership.and_then(|m| m.codice_fiscale.clone()))
                .unwrap_or_default(),
            consenso_whatsapp: bool_field(contact.and_then(|c| c.consenso_whatsapp)),
            nr_tessera: membership.and_then(|m| m.nr_tessera.clone()).unwrap_or_default(),
            note: membership.and_then(|m| m.note.clone()).unwrap_or_default(),
            safeguarding: bool_field(membership.and_then(|m| m.safeguarding)),
            scadenza: certificate
                .and_then(|c| c.scadenza)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            fonte: certificate.and_then(|c| c.fonte.clone()).unwrap_or_default(),
            esente: certificate.and_then(|c| c.esente).unwrap_or(false),
            course_ids: full.course_ids.clone(),
        }
    }

    /// Toggle a course in the multi-select.
    pub fn toggle_course(&mut self, course_id: i64) {
        if let Some(pos) = self.course_ids.iter().position(|&id| id == course_id) {
            self.course_ids.remove(pos);
        } else {
            self.course_ids.push(course_id);
        }
    }

    /// Normalise the form into backend payloads.
    ///
    /// Fails only when the trimmed display name is empty or the expiry date
    /// cannot be read; nothing is sent to the backend in that case.
    pub fn into_save(self, id: Option<Uuid>) -> Result<PersonSave, AppError> {
        let display_name = self.display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(AppError::field("display_name", DISPLAY_NAME_REQUIRED));
        }
        let scadenza = parse_date(&self.scadenza)
            .map_err(|_| AppError::field("scadenza", "Scadenza non valida (YYYY-MM-DD)"))?;
        let ruolo = Ruolo::try_from(self.ruolo.as_str()).unwrap_or_default();

        let mut course_ids = self.course_ids;
        course_ids.sort_unstable();
        course_ids.dedup();

        Ok(PersonSave {
            person: PersonPayload {
                id,
                display_name,
                nr_quota: num_or_null(&self.nr_quota),
                corso: str_or_null(&self.corso),
                ruolo,
            },
            contact: ContactPayload {
                person_id: None,
                telefono: str_or_null(&self.telefono),
                email: str_or_null(&self.email),
                codice_fiscale: str_or_null(&self.codice_fiscale),
                consenso_whatsapp: parse_consent(&self.consenso_whatsapp),
            },
            membership: MembershipPayload {
                person_id: None,
                nr_tessera: str_or_null(&self.nr_tessera),
                note: str_or_null(&self.note),
                safeguarding: parse_consent(&self.safeguarding),
            },
            certificate: CertificatePayload {
                person_id: None,
                scadenza,
                fonte: str_or_null(&self.fonte),
                esente: self.esente,
            },
            course_ids,
        })
    }
}

fn bool_field(value: Option<bool>) -> String {
    value.map(|b| b.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Field normalisation
// ---------------------------------------------------------------------------

/// Trimmed text, or `None` when blank.
pub fn str_or_null(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lenient integer parse: blank, non-numeric and fractional input become `None`.
pub fn num_or_null(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

/// Tri-state select value: `""` is unknown, `"true"` is yes, anything else is no.
pub fn parse_consent(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed == "true")
    }
}

/// Accepts `YYYY-MM-DD` or `dd/mm/yyyy`; blank is `Ok(None)`.
pub fn parse_date(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppErrorKind;
    use pretty_assertions::assert_eq;

    fn filled_form() -> PersonForm {
        PersonForm {
            display_name: "  ROSSI MARIA ".to_string(),
            nr_quota: "43".to_string(),
            corso: "Salsa Base".to_string(),
            ruolo: "COLLABORATORE".to_string(),
            telefono: " ".to_string(),
            email: "maria@example.it".to_string(),
            consenso_whatsapp: "true".to_string(),
            nr_tessera: "T-0043".to_string(),
            scadenza: "14/02/2026".to_string(),
            course_ids: vec![3, 1, 3],
            ..PersonForm::new()
        }
    }

    #[test]
    fn empty_display_name_is_rejected() {
        let form = PersonForm {
            display_name: "   ".to_string(),
            ..PersonForm::new()
        };
        let err = form.into_save(None).unwrap_err();
        assert_eq!(err.kind, AppErrorKind::ValidationError);
        assert_eq!(err.message, DISPLAY_NAME_REQUIRED);
    }

    #[test]
    fn into_save_normalises_fields() {
        let save = filled_form().into_save(None).unwrap();
        assert_eq!(save.person.display_name, "ROSSI MARIA");
        assert_eq!(save.person.nr_quota, Some(43));
        assert_eq!(save.person.ruolo, Ruolo::Collaboratore);
        assert_eq!(save.person.id, None);
        assert_eq!(save.contact.telefono, None);
        assert_eq!(save.contact.consenso_whatsapp, Some(true));
        assert_eq!(save.membership.safeguarding, None);
        assert_eq!(
            save.certificate.scadenza,
            NaiveDate::from_ymd_opt(2026, 2, 14)
        );
        assert_eq!(save.course_ids, vec![1, 3]);
    }

    #[test]
    fn invalid_date_is_a_field_error() {
        let form = PersonForm {
            scadenza: "31/02/2026".to_string(),
            ..filled_form()
        };
        let err = form.into_save(None).unwrap_err();
        assert!(err.field_errors.contains_key("scadenza"));
    }

    #[test]
    fn unknown_ruolo_falls_back_to_allievo() {
        let form = PersonForm {
            ruolo: "DOCENTE".to_string(),
            ..filled_form()
        };
        assert_eq!(form.into_save(None).unwrap().person.ruolo, Ruolo::Allievo);
    }

    #[test]
    fn new_person_payload_omits_id() {
        let save = filled_form().into_save(None).unwrap();
        let json = serde_json::to_value(&save.person).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["ruolo"], "COLLABORATORE");

        let id = Uuid::new_v4();
        let save = filled_form().into_save(Some(id)).unwrap();
        let json = serde_json::to_value(&save.person).unwrap();
        assert_eq!(json["id"], id.to_string());
    }

    #[test]
    fn dependent_payloads_send_explicit_nulls() {
        let save = filled_form().into_save(None).unwrap();
        let id = Uuid::new_v4();
        let (contact, _, certificate) = save.for_person(id);
        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["person_id"], id.to_string());
        assert!(json["telefono"].is_null());
        let json = serde_json::to_value(&certificate).unwrap();
        assert_eq!(json["scadenza"], "2026-02-14");
        assert_eq!(json["esente"], false);
    }

    #[test]
    fn num_or_null_is_lenient() {
        assert_eq!(num_or_null(""), None);
        assert_eq!(num_or_null(" 12 "), Some(12));
        assert_eq!(num_or_null("12.0"), Some(12));
        assert_eq!(num_or_null("12.5"), None);
        assert_eq!(num_or_null("abc"), None);
        assert_eq!(num_or_null("-3"), Some(-3));
    }

    #[test]
    fn parse_consent_tri_state() {
        assert_eq!(parse_consent(""), None);
        assert_eq!(parse_consent("true"), Some(true));
        assert_eq!(parse_consent("false"), Some(false));
    }

    #[test]
    fn from_full_round_trips_through_the_form() {
        let id = Uuid::new_v4();
        let full = PersonFull {
            person: Person {
                id,
                display_name: "BIANCHI LUCA".to_string(),
                nr_quota: Some(7),
                ruolo: Some("ALLIEVO".to_string()),
                corso: None,
            },
            contact: Some(Contact {
                person_id: id,
                telefono: Some("+39 333".to_string()),
                email: None,
                codice_fiscale: None,
                consenso_whatsapp: Some(false),
            }),
            membership: None,
            certificate: Some(Certificate {
                person_id: id,
                scadenza: NaiveDate::from_ymd_opt(2025, 9, 1),
                fonte: Some("Manuale".to_string()),
                esente: None,
            }),
            course_ids: vec![2],
        };
        let form = PersonForm::from_full(&full);
        assert_eq!(form.nr_quota, "7");
        assert_eq!(form.consenso_whatsapp, "false");
        assert_eq!(form.safeguarding, "");
        assert_eq!(form.scadenza, "2025-09-01");

        let save = form.into_save(Some(id)).unwrap();
        assert_eq!(save.person.id, Some(id));
        assert_eq!(save.contact.consenso_whatsapp, Some(false));
        assert_eq!(save.course_ids, vec![2]);
    }

    #[test]
    fn toggle_course_adds_and_removes() {
        let mut form = PersonForm::new();
        form.toggle_course(4);
        form.toggle_course(5);
        form.toggle_course(4);
        assert_eq!(form.course_ids, vec![5]);
    }

    #[test]
    fn search_row_tolerates_null_course_ids() {
        let json = r#"{
            "id": "7f1d2c36-8c1b-4b2e-9d5e-3b8d1c1a2f10",
            "display_name": "VERDI ANNA",
            "nr_quota": null,
            "course_ids": null,
            "cert_stato": "IN_SCADENZA"
        }"#;
        let row: PersonSearchRow = serde_json::from_str(json).unwrap();
        assert!(row.course_ids.is_empty());
        assert_eq!(row.cert_stato, Some(CertStatus::InScadenza));
    }

    #[test]
    fn ruolo_parses_case_insensitively() {
        assert_eq!(Ruolo::try_from("altro"), Ok(Ruolo::Altro));
        assert!(Ruolo::try_from("x").is_err());
    }
}
