use crate::{
    auth::AuthenticatedUser,
    db,
    error::AppError,
    models::{ProjectChanges, ProjectInput, ProjectView},
    store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

/// Payload for updating a project: the id plus at least one of the optional
/// fields.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub project_id: i32,
    #[serde(flatten)]
    pub changes: ProjectChanges,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectQuery {
    pub project_id: i32,
}

/// List the caller's active projects.
///
/// This response alone uses camelCase keys; the single-project route keeps
/// the storage layer's snake_case. The frontend depends on both shapes.
#[get("/get_projects")]
pub async fn get_projects(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let email = user.email().to_string();

    let projects = db::with_tx(&pool, move |conn| {
        Box::pin(async move { store::projects::select_active(conn, &email).await })
    })
    .await?;

    let views: Vec<ProjectView> = projects.into_iter().map(ProjectView::from).collect();

    Ok(HttpResponse::Ok().json(json!({ "projects": views })))
}

/// Fetch a single project by id.
///
/// Lookup is by `project_id` alone and also returns soft-deleted rows; see
/// the store docs for the ownership caveat.
#[get("/get_project/{id}")]
pub async fn get_project(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = project_id.into_inner();

    let project = db::with_tx(&pool, move |conn| {
        Box::pin(async move { store::projects::select_one(conn, id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "project": project })))
}

/// Create a project for the caller.
///
/// Returns the per-owner sequential id assigned to the new project.
#[post("/create_project")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let email = user.email().to_string();
    let data = project_data.into_inner();

    let project_id = db::with_tx(&pool, move |conn| {
        Box::pin(async move {
            store::projects::insert(
                conn,
                &email,
                &data.project_name,
                &data.project_description,
                data.tasks,
            )
            .await
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Project created successfully",
        "projectId": project_id
    })))
}

/// Apply a partial update to a project. At least one field besides
/// `project_id` must be present.
#[put("/update_project")]
pub async fn update_project(
    pool: web::Data<PgPool>,
    _user: AuthenticatedUser,
    update_data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let data = update_data.into_inner();

    db::with_tx(&pool, move |conn| {
        Box::pin(async move { store::projects::update(conn, data.project_id, &data.changes).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Project updated successfully" })))
}

/// Soft-delete one of the caller's projects.
///
/// The row stays in storage with `status = deleted`; it disappears from the
/// active listing but remains reachable by id.
#[delete("/delete_project")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query: web::Query<DeleteProjectQuery>,
) -> Result<impl Responder, AppError> {
    let email = user.email().to_string();
    let project_id = query.project_id;

    db::with_tx(&pool, move |conn| {
        Box::pin(async move { store::projects::soft_delete(conn, project_id, &email).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Project deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_flattens_optional_fields() {
        let payload = serde_json::json!({
            "project_id": 3,
            "project_name": "Renamed"
        });
        let request: UpdateProjectRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.project_id, 3);
        assert_eq!(request.changes.project_name.as_deref(), Some("Renamed"));
        assert!(request.changes.project_description.is_none());
        assert!(request.changes.tasks.is_none());
    }

    #[test]
    fn test_update_request_requires_project_id() {
        let payload = serde_json::json!({ "project_name": "Renamed" });
        let result: Result<UpdateProjectRequest, _> = serde_json::from_value(payload);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_rejects_non_integer_id() {
        let payload = serde_json::json!({ "project_id": "three" });
        let result: Result<UpdateProjectRequest, _> = serde_json::from_value(payload);
        assert!(result.is_err());
    }
}
