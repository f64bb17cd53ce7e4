use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::error::AppError;
use crate::people::str_or_null;

/// Course category, matching the `courses.tipo_corso` CHECK.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoCorso {
    Ballo,
    Fitness,
    ArtiMarziali,
}

impl TipoCorso {
    pub const ALL: [TipoCorso; 3] = [TipoCorso::Ballo, TipoCorso::Fitness, TipoCorso::ArtiMarziali];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Ballo => "BALLO",
            Self::Fitness => "FITNESS",
            Self::ArtiMarziali => "ARTI_MARZIALI",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ballo => "Ballo",
            Self::Fitness => "Fitness",
            Self::ArtiMarziali => "Arti marziali",
        }
    }
}

impl TryFrom<&str> for TipoCorso {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "BALLO" => Ok(Self::Ballo),
            "FITNESS" => Ok(Self::Fitness),
            "ARTI_MARZIALI" => Ok(Self::ArtiMarziali),
            _ => Err(format!("Tipo corso '{}' non valido", value)),
        }
    }
}

/// Row of the `courses` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub nome_corso: String,
    #[serde(default)]
    pub tipo_corso: Option<TipoCorso>,
    #[serde(default)]
    pub descrizione: Option<String>,
    #[serde(default)]
    pub istruttori: Option<String>,
    #[serde(default)]
    pub attivo: Option<bool>,
}

/// Row of the `v_courses_counts` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseWithCount {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default)]
    pub participants_count: i64,
}

impl CourseWithCount {
    pub fn participants_label(&self) -> String {
        format!("{} partecipanti", self.participants_count)
    }
}

/// Row of the `person_courses` join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonCourseLink {
    pub person_id: Uuid,
    pub course_id: i64,
}

/// Client-side course list filter: type chip plus name substring.
pub fn filter_courses<'a>(
    courses: &'a [CourseWithCount],
    tipo: Option<TipoCorso>,
    q: &str,
) -> Vec<&'a CourseWithCount> {
    let needle = q.trim().to_lowercase();
    courses
        .iter()
        .filter(|c| tipo.is_none() || c.course.tipo_corso == tipo)
        .filter(|c| needle.is_empty() || c.course.nome_corso.to_lowercase().contains(&needle))
        .collect()
}

/// Courses grouped for the editor's multi-select; untyped courses come last.
pub fn group_by_type(courses: &[Course]) -> Vec<(Option<TipoCorso>, Vec<&Course>)> {
    let mut groups: Vec<(Option<TipoCorso>, Vec<&Course>)> = TipoCorso::ALL
        .iter()
        .map(|t| (Some(*t), Vec::new()))
        .chain(std::iter::once((None, Vec::new())))
        .collect();
    for course in courses {
        if let Some((_, bucket)) = groups.iter_mut().find(|(t, _)| *t == course.tipo_corso) {
            bucket.push(course);
        }
    }
    for (_, bucket) in groups.iter_mut() {
        bucket.sort_by(|a, b| a.nome_corso.to_lowercase().cmp(&b.nome_corso.to_lowercase()));
    }
    groups.retain(|(_, bucket)| !bucket.is_empty());
    groups
}

/// Inserts and deletes needed to move a person from `current` to `desired` courses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseLinkDiff {
    pub add: Vec<i64>,
    pub remove: Vec<i64>,
}

impl CourseLinkDiff {
    pub fn between(current: &[i64], desired: &[i64]) -> Self {
        let current: BTreeSet<i64> = current.iter().copied().collect();
        let desired: BTreeSet<i64> = desired.iter().copied().collect();
        Self {
            add: desired.difference(&current).copied().collect(),
            remove: current.difference(&desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Upsert body for `courses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CourseSave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Nome corso obbligatorio"))
    )]
    pub nome_corso: String,
    pub tipo_corso: Option<TipoCorso>,
    pub descrizione: Option<String>,
    pub istruttori: Option<String>,
    pub attivo: bool,
}

/// Raw course sheet state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseForm {
    pub nome_corso: String,
    pub tipo_corso: String,
    pub descrizione: String,
    pub istruttori: String,
    pub attivo: bool,
}

impl Default for CourseForm {
    fn default() -> Self {
        Self {
            nome_corso: String::new(),
            tipo_corso: TipoCorso::Ballo.as_db_str().to_string(),
            descrizione: String::new(),
            istruttori: String::new(),
            attivo: true,
        }
    }
}

impl CourseForm {
    pub fn from_course(course: &Course) -> Self {
        Self {
            nome_corso: course.nome_corso.clone(),
            tipo_corso: course
                .tipo_corso
                .map(|t| t.as_db_str().to_string())
                .unwrap_or_default(),
            descrizione: course.descrizione.clone().unwrap_or_default(),
            istruttori: course.istruttori.clone().unwrap_or_default(),
            attivo: course.attivo.unwrap_or(true),
        }
    }

    pub fn into_save(self, id: Option<i64>) -> Result<CourseSave, AppError> {
        let nome_corso = self.nome_corso.trim().to_string();
        if nome_corso.is_empty() {
            return Err(AppError::field("nome_corso", "Nome corso obbligatorio"));
        }
        Ok(CourseSave {
            id,
            nome_corso,
            tipo_corso: TipoCorso::try_from(self.tipo_corso.as_str()).ok(),
            descrizione: str_or_null(&self.descrizione),
            istruttori: str_or_null(&self.istruttori),
            attivo: self.attivo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn course(id: i64, nome: &str, tipo: Option<TipoCorso>) -> Course {
        Course {
            id,
            nome_corso: nome.to_string(),
            tipo_corso: tipo,
            descrizione: None,
            istruttori: None,
            attivo: Some(true),
        }
    }

    #[test]
    fn link_diff_adds_and_removes() {
        let diff = CourseLinkDiff::between(&[1, 2, 3], &[3, 4, 4, 1]);
        assert_eq!(diff.add, vec![4]);
        assert_eq!(diff.remove, vec![2]);
        assert!(CourseLinkDiff::between(&[5], &[5]).is_empty());
    }

    #[test]
    fn filter_by_type_and_name() {
        let rows = vec![
            CourseWithCount {
                course: course(1, "Salsa Base", Some(TipoCorso::Ballo)),
                participants_count: 4,
            },
            CourseWithCount {
                course: course(2, "Pilates", Some(TipoCorso::Fitness)),
                participants_count: 0,
            },
            CourseWithCount {
                course: course(3, "Salsa Avanzato", Some(TipoCorso::Ballo)),
                participants_count: 2,
            },
        ];
        assert_eq!(filter_courses(&rows, None, "").len(), 3);
        assert_eq!(filter_courses(&rows, Some(TipoCorso::Fitness), "").len(), 1);
        let salsa = filter_courses(&rows, Some(TipoCorso::Ballo), " avanz ");
        assert_eq!(salsa.len(), 1);
        assert_eq!(salsa[0].course.id, 3);
        assert_eq!(rows[0].participants_label(), "4 partecipanti");
    }

    #[test]
    fn grouping_orders_types_and_names() {
        let courses = vec![
            course(1, "Zumba", Some(TipoCorso::Fitness)),
            course(2, "Karate", Some(TipoCorso::ArtiMarziali)),
            course(3, "bachata", Some(TipoCorso::Ballo)),
            course(4, "Aerobica", Some(TipoCorso::Fitness)),
            course(5, "Open day", None),
        ];
        let groups = group_by_type(&courses);
        let shape: Vec<(Option<TipoCorso>, Vec<i64>)> = groups
            .iter()
            .map(|(t, cs)| (*t, cs.iter().map(|c| c.id).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![
                (Some(TipoCorso::Ballo), vec![3]),
                (Some(TipoCorso::Fitness), vec![4, 1]),
                (Some(TipoCorso::ArtiMarziali), vec![2]),
                (None, vec![5]),
            ]
        );
    }

    #[test]
    fn course_form_requires_name() {
        let err = CourseForm::default().into_save(None).unwrap_err();
        assert!(err.field_errors.contains_key("nome_corso"));

        let save = CourseForm {
            nome_corso: " Hip Hop ".to_string(),
            istruttori: "".to_string(),
            ..CourseForm::default()
        }
        .into_save(Some(9))
        .unwrap();
        assert_eq!(save.nome_corso, "Hip Hop");
        assert_eq!(save.tipo_corso, Some(TipoCorso::Ballo));
        assert_eq!(save.istruttori, None);
        assert_eq!(save.id, Some(9));
    }

    #[test]
    fn counts_view_row_flattens_course_columns() {
        let json = r#"{"id":3,"nome_corso":"Kick boxing","tipo_corso":"ARTI_MARZIALI","participants_count":11}"#;
        let row: CourseWithCount = serde_json::from_str(json).unwrap();
        assert_eq!(row.course.tipo_corso, Some(TipoCorso::ArtiMarziali));
        assert_eq!(row.participants_count, 11);
    }
}
