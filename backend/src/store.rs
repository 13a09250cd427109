use crate::config::Storage;
use crate::error::StoreError;
use shared::Task;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::time::Duration;

const TITLE_REQUIRED: &str = "Title is required";

/// Durable CRUD over the `tasks` table.
///
/// Cloning is cheap and every clone shares one connection pool, so a single
/// store opened at startup is handed to every request handler.
#[derive(Clone, Debug)]
pub struct TaskStore {
    pool: SqlitePool,
}

fn row_to_task(row: SqliteRow) -> Result<Task, StoreError> {
    let completed: Option<i64> = row.try_get("completed")?;
    Ok(Task {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: completed.unwrap_or(0) != 0,
        created_at: row.try_get("created_at")?,
    })
}

impl TaskStore {
    /// Opens the store and makes sure the schema exists.
    pub async fn open(storage: Storage) -> Result<Self, StoreError> {
        tracing::info!("Opening task store: {:?}", storage);

        let pool = match storage {
            // An in-memory database lives exactly as long as its connection,
            // so the pool holds one connection that never expires.
            Storage::Memory => {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None::<Duration>)
                    .max_lifetime(None::<Duration>)
                    .connect_with(SqliteConnectOptions::new())
                    .await?
            }
            Storage::File(path) => {
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePool::connect_with(options).await?
            }
        };

        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StoreError> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                completed INTEGER DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Task table ready");
        Ok(())
    }

    /// Closes every pooled connection. An in-memory store is gone afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Task store closed");
    }

    /// All tasks, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, StoreError> {
        // created_at has one-second resolution; id breaks ties in insertion order.
        let rows = sqlx::query(
            "SELECT id, title, description, completed, created_at FROM tasks \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_task).collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Task, StoreError> {
        let row = sqlx::query(
            "SELECT id, title, description, completed, created_at FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row_to_task(row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    /// Inserts a new, not yet completed task and returns the persisted row.
    ///
    /// Fails with [`StoreError::Validation`] when `title` is missing or empty;
    /// nothing is written in that case. A missing description is stored as an
    /// empty string.
    #[tracing::instrument(skip(self))]
    pub async fn create(
        &self,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Task, StoreError> {
        let title = match title {
            Some(title) if !title.is_empty() => title,
            _ => return Err(StoreError::Validation(TITLE_REQUIRED.to_string())),
        };

        let row = sqlx::query(
            "INSERT INTO tasks (title, description) VALUES (?, ?) \
             RETURNING id, title, description, completed, created_at",
        )
        .bind(title)
        .bind(description.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;

        let task = row_to_task(row)?;
        tracing::info!("Created task {}", task.id);
        Ok(task)
    }

    /// Replaces title, description and completion flag of task `id`.
    ///
    /// The values are written as given: the title is not re-validated and a
    /// missing description is stored as NULL. A missing title reaches the
    /// engine as NULL and is rejected by the `NOT NULL` constraint. The returned
    /// task echoes the supplied values and carries no `created_at`.
    #[tracing::instrument(skip(self))]
    pub async fn update(
        &self,
        id: i64,
        title: Option<String>,
        description: Option<String>,
        completed: bool,
    ) -> Result<Task, StoreError> {
        let rows_affected =
            sqlx::query("UPDATE tasks SET title = ?, description = ?, completed = ? WHERE id = ?")
                .bind(&title)
                .bind(&description)
                .bind(i64::from(completed))
                .bind(id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(Task {
            id,
            title: title.unwrap_or_default(),
            description,
            completed,
            created_at: None,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let rows_affected = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!("Deleted task {}", id);
        Ok(())
    }

    /// Removes every row. The id sequence is left untouched.
    pub async fn clear(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tasks").execute(&self.pool).await?;
        Ok(())
    }
}
