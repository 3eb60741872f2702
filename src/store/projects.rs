//!
//! # Project Store
//!
//! Operations against `projects.saved_projects`. Project ids are sequential
//! per owner, assigned as `max + 1` under a per-owner advisory transaction
//! lock so concurrent inserts for the same owner still produce unique,
//! contiguous ids. Deletion is soft: rows flip to `deleted` and drop out of
//! the active listing, but stay retrievable by id.
//!
//! `update` and `select_one` match on `project_id` alone, with no owner in
//! the WHERE clause. That mirrors the existing API contract; since ids
//! collide across owners by construction, see DESIGN.md before relying on it.

use sqlx::PgConnection;

use crate::error::AppError;
use crate::models::{Project, ProjectChanges};
use crate::schema::saved_projects as sp;
use crate::store::users;

fn project_columns() -> String {
    [
        sp::PROJECT_ID,
        sp::EMAIL,
        sp::PROJECT_NAME,
        sp::PROJECT_DESCRIPTION,
        sp::TASKS,
        sp::STATUS,
        sp::CREATED_AT,
        sp::UPDATED_AT,
        sp::DELETED_AT,
    ]
    .join(", ")
}

/// Renders the UPDATE statement for the supplied changes. Bind order is the
/// declaration order of `ProjectChanges` (name, description, tasks), with
/// `project_id` last. Callers must reject empty change sets first; see
/// `ProjectChanges::is_empty`.
fn build_update_sql(changes: &ProjectChanges) -> String {
    let mut assignments: Vec<String> = Vec::new();
    let mut param = 1;

    if changes.project_name.is_some() {
        assignments.push(format!("{} = ${}", sp::PROJECT_NAME, param));
        param += 1;
    }
    if changes.project_description.is_some() {
        assignments.push(format!("{} = ${}", sp::PROJECT_DESCRIPTION, param));
        param += 1;
    }
    if changes.tasks.is_some() {
        assignments.push(format!("{} = ${}", sp::TASKS, param));
        param += 1;
    }

    assignments.push(format!("{} = CURRENT_TIMESTAMP", sp::UPDATED_AT));

    format!(
        "UPDATE {table} SET {assignments} WHERE {project_id} = ${param}",
        table = sp::TABLE,
        assignments = assignments.join(", "),
        project_id = sp::PROJECT_ID,
        param = param,
    )
}

/// Inserts a new project for `owner` and returns its per-owner id.
///
/// The owner must reference a registered user. The advisory lock keyed on the
/// owner email serializes the max-read and the insert against concurrent
/// inserts for the same owner; different owners proceed in parallel.
pub async fn insert(
    conn: &mut PgConnection,
    owner: &str,
    name: &str,
    description: &str,
    tasks: Option<serde_json::Value>,
) -> Result<i32, AppError> {
    users::email_exists(conn, owner).await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(owner)
        .execute(&mut *conn)
        .await?;

    let next_id_sql = format!(
        "SELECT COALESCE(MAX({project_id}), 0) + 1 FROM {table} WHERE {email} = $1",
        project_id = sp::PROJECT_ID,
        table = sp::TABLE,
        email = sp::EMAIL,
    );

    let next_id: i32 = sqlx::query_scalar(&next_id_sql)
        .bind(owner)
        .fetch_one(&mut *conn)
        .await?;

    let insert_sql = format!(
        "INSERT INTO {table} ({project_id}, {email}, {name}, {description}, {tasks}) \
         VALUES ($1, $2, $3, $4, $5)",
        table = sp::TABLE,
        project_id = sp::PROJECT_ID,
        email = sp::EMAIL,
        name = sp::PROJECT_NAME,
        description = sp::PROJECT_DESCRIPTION,
        tasks = sp::TASKS,
    );

    sqlx::query(&insert_sql)
        .bind(next_id)
        .bind(owner)
        .bind(name)
        .bind(description)
        .bind(tasks)
        .execute(&mut *conn)
        .await?;

    Ok(next_id)
}

/// Applies a partial update to the project matching `project_id`.
///
/// At least one field must be supplied; untouched fields keep their stored
/// values.
pub async fn update(
    conn: &mut PgConnection,
    project_id: i32,
    changes: &ProjectChanges,
) -> Result<(), AppError> {
    if changes.is_empty() {
        return Err(AppError::Validation(
            "No fields to update were provided".into(),
        ));
    }

    let sql = build_update_sql(changes);

    let mut query = sqlx::query(&sql);
    if let Some(name) = &changes.project_name {
        query = query.bind(name);
    }
    if let Some(description) = &changes.project_description {
        query = query.bind(description);
    }
    if let Some(tasks) = &changes.tasks {
        query = query.bind(tasks);
    }
    query = query.bind(project_id);

    query.execute(&mut *conn).await?;

    Ok(())
}

/// Marks the project as deleted and stamps `deleted_at`, matched by the full
/// composite key. The transition is one-way; there is no undelete.
pub async fn soft_delete(
    conn: &mut PgConnection,
    project_id: i32,
    owner: &str,
) -> Result<(), AppError> {
    let sql = format!(
        "UPDATE {table} SET {status} = $1, {deleted_at} = CURRENT_TIMESTAMP \
         WHERE {project_id} = $2 AND {email} = $3",
        table = sp::TABLE,
        status = sp::STATUS,
        deleted_at = sp::DELETED_AT,
        project_id = sp::PROJECT_ID,
        email = sp::EMAIL,
    );

    let result = sqlx::query(&sql)
        .bind(sp::STATUS_DELETED)
        .bind(project_id)
        .bind(owner)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "No project found with project_id={} for this user",
            project_id
        )));
    }

    Ok(())
}

/// Returns the owner's active projects, in storage order. Soft-deleted rows
/// are invisible here.
pub async fn select_active(
    conn: &mut PgConnection,
    owner: &str,
) -> Result<Vec<Project>, AppError> {
    users::email_exists(conn, owner).await?;

    let sql = format!(
        "SELECT {columns} FROM {table} WHERE {email} = $1 AND {status} = $2",
        columns = project_columns(),
        table = sp::TABLE,
        email = sp::EMAIL,
        status = sp::STATUS,
    );

    let projects = sqlx::query_as::<_, Project>(&sql)
        .bind(owner)
        .bind(sp::STATUS_ACTIVE)
        .fetch_all(&mut *conn)
        .await?;

    Ok(projects)
}

/// Fetches one project by id, regardless of owner or status. Soft-deleted
/// rows are still reachable here.
pub async fn select_one(conn: &mut PgConnection, project_id: i32) -> Result<Project, AppError> {
    let sql = format!(
        "SELECT {columns} FROM {table} WHERE {project_id} = $1",
        columns = project_columns(),
        table = sp::TABLE,
        project_id = sp::PROJECT_ID,
    );

    let project = sqlx::query_as::<_, Project>(&sql)
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?;

    project.ok_or_else(|| AppError::NotFound(format!("Project ID {} does not exist", project_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_project_columns_come_from_schema_registry() {
        let columns = project_columns();
        for column in [
            sp::PROJECT_ID,
            sp::EMAIL,
            sp::PROJECT_NAME,
            sp::PROJECT_DESCRIPTION,
            sp::TASKS,
            sp::STATUS,
            sp::CREATED_AT,
            sp::UPDATED_AT,
            sp::DELETED_AT,
        ] {
            assert!(columns.contains(column), "missing column {}", column);
        }
        assert_eq!(columns.matches(", ").count(), 8);
    }

    #[test]
    fn test_build_update_sql_single_field() {
        let changes = ProjectChanges {
            project_name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let sql = build_update_sql(&changes);
        assert_eq!(
            sql,
            "UPDATE projects.saved_projects SET project_name = $1, \
             updated_at = CURRENT_TIMESTAMP WHERE project_id = $2"
        );
    }

    #[test]
    fn test_build_update_sql_all_fields() {
        let changes = ProjectChanges {
            project_name: Some("Renamed".to_string()),
            project_description: Some("New description".to_string()),
            tasks: Some(serde_json::json!([])),
        };
        let sql = build_update_sql(&changes);
        assert_eq!(
            sql,
            "UPDATE projects.saved_projects SET project_name = $1, \
             project_description = $2, tasks = $3, \
             updated_at = CURRENT_TIMESTAMP WHERE project_id = $4"
        );
    }

    #[test]
    fn test_build_update_sql_skips_absent_fields() {
        let changes = ProjectChanges {
            tasks: Some(serde_json::json!({"children": []})),
            ..Default::default()
        };
        let sql = build_update_sql(&changes);
        assert!(sql.contains("tasks = $1"));
        assert!(!sql.contains("project_name"));
        assert!(!sql.contains("project_description ="));
        assert!(sql.ends_with("WHERE project_id = $2"));
    }
}
