use dioxus::prelude::*;
use shared_types::{CourseSave, CourseWithCount, Person};
use uuid::Uuid;

#[cfg(feature = "server")]
use crate::error_convert::ValidateRequest;

#[cfg(feature = "server")]
use super::auth::*;

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_courses() -> Result<Vec<CourseWithCount>, ServerFnError> {
    let session = require_session()?;
    crate::repo::courses::list_with_counts(store()?, &session.access_token)
        .await
        .map_err(fail)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn list_course_participants(course_id: i64) -> Result<Vec<Person>, ServerFnError> {
    let session = require_session()?;
    crate::repo::courses::participants(store()?, &session.access_token, course_id)
        .await
        .map_err(fail)
}

/// Enroll people; returns how many were submitted.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn add_people_to_course(course_id: i64, person_ids: Vec<Uuid>) -> Result<usize, ServerFnError> {
    let session = require_session()?;
    let added = crate::repo::courses::add_people(store()?, &session.access_token, course_id, &person_ids)
        .await
        .map_err(fail)?;
    tracing::info!(course_id, added, "participants added");
    Ok(added)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn remove_person_from_course(course_id: i64, person_id: Uuid) -> Result<(), ServerFnError> {
    let session = require_session()?;
    crate::repo::courses::remove_person(store()?, &session.access_token, course_id, person_id)
        .await
        .map_err(fail)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn course_participants_count(course_id: i64) -> Result<i64, ServerFnError> {
    let session = require_session()?;
    crate::repo::courses::participants_count(store()?, &session.access_token, course_id)
        .await
        .map_err(fail)
}

/// Create or update a course; returns its id.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn save_course(course: CourseSave) -> Result<i64, ServerFnError> {
    let session = require_session()?;
    course.validate_request().map_err(fail)?;
    crate::repo::courses::save(store()?, &session.access_token, &course)
        .await
        .map_err(fail)
}

#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn delete_course(course_id: i64) -> Result<(), ServerFnError> {
    let session = require_session()?;
    crate::repo::courses::delete(store()?, &session.access_token, course_id)
        .await
        .map_err(fail)?;
    tracing::info!(course_id, "course deleted");
    Ok(())
}
