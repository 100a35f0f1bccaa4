use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::error::DatabaseError;
use crate::database::models::{Task, TaskId, TaskPatch};
use crate::database::store::TaskStore;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL,
        title       TEXT NOT NULL,
        description TEXT,
        status      TEXT NOT NULL,
        priority    TEXT NOT NULL,
        due_date    BIGINT,
        created_at  BIGINT NOT NULL,
        seq         BIGSERIAL
    )
"#;

const CREATE_INDEX: &str = "CREATE INDEX IF NOT EXISTS tasks_by_user ON tasks (user_id)";

const SELECT_COLUMNS: &str =
    "id, user_id, title, description, status, priority, due_date, created_at";

#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    user_id: String,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<i64>,
    created_at: i64,
}

impl TryFrom<TaskRow> for Task {
    type Error = DatabaseError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        // status/priority are plain TEXT columns; a bad value here means the row was written outside this service
        let status = row
            .status
            .parse()
            .map_err(|e| DatabaseError::QueryError(format!("task {}: {}", row.id, e)))?;
        let priority = row
            .priority
            .parse()
            .map_err(|e| DatabaseError::QueryError(format!("task {}: {}", row.id, e)))?;

        Ok(Task {
            id: TaskId::from(row.id),
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            status,
            priority,
            due_date: row.due_date,
            created_at: row.created_at,
        })
    }
}

/// `tasks` table on PostgreSQL
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the table and the owner index if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, task: Task) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO tasks (id, user_id, title, description, status, priority, due_date, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(task.id.as_str())
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DatabaseError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Task::try_from).transpose()
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY seq",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Task::try_from).collect()
    }

    async fn patch(&self, id: &TaskId, patch: &TaskPatch) -> Result<(), DatabaseError> {
        // Single statement: omitted fields keep the stored value
        let result = sqlx::query(
            "UPDATE tasks SET
                title       = COALESCE($2, title),
                description = COALESCE($3, description),
                status      = COALESCE($4, status),
                due_date    = COALESCE($5, due_date),
                priority    = COALESCE($6, priority)
             WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.due_date)
        .bind(patch.priority.map(|p| p.as_str()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("task {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("task {}", id)));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
