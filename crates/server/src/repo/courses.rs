use serde_json::{json, Value};
use shared_types::{AppError, CourseSave, CourseWithCount, Person};
use uuid::Uuid;

use crate::gateway::{Delete, Filter, Order, Select, Store, Upsert};

pub const COUNTS_VIEW: &str = "v_courses_counts";

/// Every course with its participant count, by name.
pub async fn list_with_counts<S: Store>(store: &S, token: &str) -> Result<Vec<CourseWithCount>, AppError> {
    let select = Select::from(COUNTS_VIEW).order(Order::asc("nome_corso"));
    store.select(token, &select).await?.decode()
}

/// People enrolled in a course, alphabetical. Two reads: the join rows, then the people.
pub async fn participants<S: Store>(store: &S, token: &str, course_id: i64) -> Result<Vec<Person>, AppError> {
    let links = Select::from("person_courses")
        .columns("person_id")
        .filter(Filter::eq("course_id", course_id));
    let ids: Vec<String> = store
        .select(token, &links)
        .await?
        .rows
        .iter()
        .filter_map(|r| r.get("person_id").and_then(Value::as_str).map(str::to_string))
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let people = Select::from("people")
        .filter(Filter::is_in("id", ids))
        .order(Order::asc("display_name"));
    store.select(token, &people).await?.decode()
}

/// Enroll people in a course; pairs already present are left alone.
pub async fn add_people<S: Store>(
    store: &S,
    token: &str,
    course_id: i64,
    person_ids: &[Uuid],
) -> Result<usize, AppError> {
    if person_ids.is_empty() {
        return Ok(0);
    }
    let links = Upsert::into_table("person_courses")
        .on_conflict("person_id,course_id")
        .ignore_duplicates()
        .rows(
            person_ids
                .iter()
                .map(|id| json!({ "person_id": id, "course_id": course_id })),
        );
    store.upsert(token, &links).await?;
    Ok(person_ids.len())
}

pub async fn remove_person<S: Store>(
    store: &S,
    token: &str,
    course_id: i64,
    person_id: Uuid,
) -> Result<(), AppError> {
    let unlink = Delete::from("person_courses")
        .filter(Filter::eq("course_id", course_id))
        .filter(Filter::eq("person_id", person_id));
    store.delete(token, &unlink).await
}

pub async fn participants_count<S: Store>(store: &S, token: &str, course_id: i64) -> Result<i64, AppError> {
    let select = Select::from("person_courses")
        .columns("person_id")
        .filter(Filter::eq("course_id", course_id))
        .head();
    Ok(store.select(token, &select).await?.total.unwrap_or(0))
}

/// Create or update a course; returns its id.
pub async fn save<S: Store>(store: &S, token: &str, course: &CourseSave) -> Result<i64, AppError> {
    let row = serde_json::to_value(course).map_err(|e| AppError::internal(e.to_string()))?;
    let upsert = Upsert::into_table("courses").on_conflict("id").row(row).returning();
    let written = store.upsert(token, &upsert).await?;
    course
        .id
        .or_else(|| written.first().and_then(|r| r.get("id")).and_then(Value::as_i64))
        .ok_or_else(|| AppError::internal("Il backend non ha restituito l'id del corso"))
}

/// Delete a course; its enrolments go with it.
pub async fn delete<S: Store>(store: &S, token: &str, course_id: i64) -> Result<(), AppError> {
    store
        .delete(token, &Delete::from("courses").filter(Filter::eq("id", course_id)))
        .await
}
