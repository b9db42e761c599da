use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::tasks::dto::{CreateTaskRequest, DeleteTaskResponse, TaskFilter, UpdateTaskRequest};
use crate::tasks::repo::Task;

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", put(update_task).delete(delete_task))
}

/// A record may only be touched by the identity its owner field references.
/// Mismatches answer 401, matching the original API's mapping.
fn ensure_owner(task: &Task, user_id: Uuid, action: &str) -> Result<(), ApiError> {
    if task.user_id != user_id {
        warn!(task_id = %task.id, owner = %task.user_id, caller = %user_id, "ownership violation");
        return Err(ApiError::Forbidden(format!(
            "Not authorized to {action} this task"
        )));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Task must have a title".into()));
    }

    // Owner comes from the token; any client-supplied owner is not even
    // representable in the request body.
    let task = Task::create(
        &state.db,
        user_id,
        title,
        payload.description.as_deref(),
        payload.priority.unwrap_or_default(),
    )
    .await?;

    info!(task_id = %task.id, user_id = %user_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = Task::list_by_user(&state.db, user_id, &filter).await?;
    Ok(Json(tasks))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let mut task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    // Checked strictly before any field is touched.
    ensure_owner(&task, user_id, "update")?;

    payload.apply(&mut task);
    let task = task.save(&state.db).await?;

    info!(task_id = %task.id, user_id = %user_id, "task updated");
    Ok(Json(task))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteTaskResponse>, ApiError> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".into()))?;

    ensure_owner(&task, user_id, "delete")?;

    Task::delete(&state.db, task.id).await?;

    info!(task_id = %task.id, user_id = %user_id, "task deleted");
    Ok(Json(DeleteTaskResponse {
        message: "Task removed".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::repo_types::Priority;
    use time::OffsetDateTime;

    fn task_owned_by(owner: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            user_id: owner,
            title: "Buy milk".into(),
            description: None,
            is_completed: false,
            priority: Priority::Medium,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_passes_the_ownership_check() {
        let owner = Uuid::new_v4();
        let task = task_owned_by(owner);
        assert!(ensure_owner(&task, owner, "update").is_ok());
    }

    #[test]
    fn foreign_caller_is_refused_with_401() {
        let task = task_owned_by(Uuid::new_v4());
        let stranger = Uuid::new_v4();
        let err = ensure_owner(&task, stranger, "delete").unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Not authorized to delete this task");
    }

    #[test]
    fn refusal_does_not_leak_existence_details() {
        // Cross-owner access answers the ownership violation, never 404.
        let task = task_owned_by(Uuid::new_v4());
        let err = ensure_owner(&task, Uuid::new_v4(), "update").unwrap_err();
        assert_ne!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
