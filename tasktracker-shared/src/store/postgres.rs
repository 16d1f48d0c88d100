/// PostgreSQL store backend
///
/// Production implementation of the store traits on top of sqlx. All
/// writes are single-statement upserts keyed by id; the service layer owns
/// ids and timestamps, so this module is purely mechanical.
///
/// # Example
///
/// ```no_run
/// use tasktracker_shared::store::postgres::PgStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgStore::connect("postgresql://localhost/tasktracker", 10).await?;
/// store.run_migrations().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{ProjectStore, StoreError, StoreResult, TaskStore, UserStore};
use crate::models::page::{Page, PageRequest};
use crate::models::project::Project;
use crate::models::task::{Task, TaskFilter};
use crate::models::user::User;

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";
const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, \
                            project_id, assigned_user_id, created_at, updated_at";

/// Schema migration, applied statement by statement at startup.
/// `tasks.project_id` cascades so deleting a project removes its tasks.
const MIGRATIONS: &[&str] = &[
    r#"
    DO $$ BEGIN
        CREATE TYPE user_role AS ENUM ('admin', 'manager', 'user');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    DO $$ BEGIN
        CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
    EXCEPTION WHEN duplicate_object THEN NULL;
    END $$
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash VARCHAR(255) NOT NULL,
        role user_role NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id UUID PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        description TEXT,
        owner_id UUID NOT NULL REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id UUID PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        status task_status NOT NULL,
        priority task_priority NOT NULL,
        due_date DATE,
        project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        assigned_user_id UUID REFERENCES users(id),
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_projects_owner ON projects(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(assigned_user_id)",
];

/// Store backend over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects a pool to the given database URL
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Some(Duration::from_secs(600)))
            .connect(url)
            .await?;

        info!(max_connections, "Database pool created");
        Ok(Self { pool })
    }

    /// Wraps an existing pool
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the schema migration
    pub async fn run_migrations(&self) -> StoreResult<()> {
        for statement in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date");
        Ok(())
    }

    /// Runs a filtered, paginated task listing for one scope predicate
    ///
    /// `scope` is a SQL predicate over `$1` (e.g. `project_id = $1`);
    /// status/priority filters are appended conjunctively.
    async fn page_tasks(
        &self,
        scope: &str,
        scope_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>> {
        let mut predicate = format!("WHERE {}", scope);
        let mut bind_count = 1;

        if filter.status.is_some() {
            bind_count += 1;
            predicate.push_str(&format!(" AND status = ${}", bind_count));
        }
        if filter.priority.is_some() {
            bind_count += 1;
            predicate.push_str(&format!(" AND priority = ${}", bind_count));
        }

        let count_sql = format!("SELECT COUNT(*) FROM tasks {}", predicate);
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql).bind(scope_id);
        if let Some(status) = filter.status {
            count_query = count_query.bind(status);
        }
        if let Some(priority) = filter.priority {
            count_query = count_query.bind(priority);
        }
        let (total,) = count_query.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT {} FROM tasks {} ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            TASK_COLUMNS,
            predicate,
            bind_count + 1,
            bind_count + 2,
        );
        let mut list_query = sqlx::query_as::<_, Task>(&list_sql).bind(scope_id);
        if let Some(status) = filter.status {
            list_query = list_query.bind(status);
        }
        if let Some(priority) = filter.priority {
            list_query = list_query.bind(priority);
        }
        let tasks = list_query
            .bind(i64::from(page.limit()))
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(tasks, &page, total as u64))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password_hash = EXCLUDED.password_hash,
                role = EXCLUDED.role,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn list_projects_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC",
            PROJECT_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn save_project(&self, project: &Project) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, description, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                owner_id = EXCLUDED.owner_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.owner_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(&self, filter: TaskFilter, page: PageRequest)
        -> StoreResult<Page<Task>> {
        // Degenerate scope predicate; keeps the $1 slot occupied so the
        // shared query builder also serves the unscoped listing
        self.page_tasks("$1 = $1", Uuid::nil(), filter, page).await
    }

    async fn list_tasks_by_project(
        &self,
        project_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>> {
        self.page_tasks("project_id = $1", project_id, filter, page).await
    }

    async fn list_tasks_by_assignee(
        &self,
        user_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>> {
        self.page_tasks("assigned_user_id = $1", user_id, filter, page).await
    }

    async fn save_task(&self, task: &Task) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, status, priority, due_date,
                               project_id, assigned_user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                status = EXCLUDED.status,
                priority = EXCLUDED.priority,
                due_date = EXCLUDED.due_date,
                assigned_user_id = EXCLUDED.assigned_user_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.project_id)
        .bind(task.assigned_user_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
