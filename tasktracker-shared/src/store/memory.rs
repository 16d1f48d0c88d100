/// In-memory store backend
///
/// Map-backed implementation of the store traits. The service test suite
/// runs against this backend so the full authorization matrix is exercised
/// without a database; ordering and pagination semantics match `PgStore`
/// (newest first by creation time).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ProjectStore, StoreResult, TaskStore, UserStore};
use crate::models::page::{Page, PageRequest};
use crate::models::project::Project;
use crate::models::task::{Task, TaskFilter};
use crate::models::user::User;

/// Store backend holding all records in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(task: &Task, filter: TaskFilter) -> bool {
        filter.status.map_or(true, |s| task.status == s)
            && filter.priority.map_or(true, |p| task.priority == p)
    }

    fn paginate(mut tasks: Vec<Task>, page: PageRequest) -> Page<Task> {
        // Newest first, id as tiebreak so ordering is total
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = tasks.len() as u64;
        let items = tasks
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Page::new(items, &page, total)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        self.users.write().unwrap().insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.projects.read().unwrap().get(&id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> =
            self.projects.read().unwrap().values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn list_projects_by_owner(&self, owner_id: Uuid) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .unwrap()
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn save_project(&self, project: &Project) -> StoreResult<()> {
        self.projects
            .write()
            .unwrap()
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let removed = self.projects.write().unwrap().remove(&id).is_some();
        if removed {
            // Mirror the ON DELETE CASCADE in the Postgres schema
            self.tasks
                .write()
                .unwrap()
                .retain(|_, task| task.project_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().unwrap().get(&id).cloned())
    }

    async fn list_tasks(&self, filter: TaskFilter, page: PageRequest)
        -> StoreResult<Page<Task>> {
        let tasks: Vec<Task> = self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| Self::matches(t, filter))
            .cloned()
            .collect();
        Ok(Self::paginate(tasks, page))
    }

    async fn list_tasks_by_project(
        &self,
        project_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>> {
        let tasks: Vec<Task> = self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.project_id == project_id && Self::matches(t, filter))
            .cloned()
            .collect();
        Ok(Self::paginate(tasks, page))
    }

    async fn list_tasks_by_assignee(
        &self,
        user_id: Uuid,
        filter: TaskFilter,
        page: PageRequest,
    ) -> StoreResult<Page<Task>> {
        let tasks: Vec<Task> = self
            .tasks
            .read()
            .unwrap()
            .values()
            .filter(|t| t.assigned_user_id == Some(user_id) && Self::matches(t, filter))
            .cloned()
            .collect();
        Ok(Self::paginate(tasks, page))
    }

    async fn save_task(&self, task: &Task) -> StoreResult<()> {
        self.tasks.write().unwrap().insert(task.id, task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.tasks.write().unwrap().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{CreateTask, TaskPriority, TaskStatus};
    use crate::models::user::{CreateUser, Role};

    fn task(project_id: Uuid, status: TaskStatus, priority: TaskPriority) -> Task {
        Task::new(
            project_id,
            CreateTask {
                title: "t".to_string(),
                description: None,
                status: Some(status),
                priority: Some(priority),
                due_date: None,
                assigned_user_id: None,
            },
        )
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let store = InMemoryStore::new();
        let user = User::new(CreateUser {
            email: "Admin@Example.com".to_string(),
            password_hash: "h".to_string(),
            role: Role::Admin,
        });
        store.save_user(&user).await.unwrap();

        assert!(store.email_exists("admin@example.com").await.unwrap());
        let found = store
            .find_user_by_email("ADMIN@EXAMPLE.COM")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_filters_are_conjunctive() {
        let store = InMemoryStore::new();
        let project_id = Uuid::new_v4();

        store
            .save_task(&task(project_id, TaskStatus::Todo, TaskPriority::High))
            .await
            .unwrap();
        store
            .save_task(&task(project_id, TaskStatus::Todo, TaskPriority::Low))
            .await
            .unwrap();
        store
            .save_task(&task(project_id, TaskStatus::Done, TaskPriority::High))
            .await
            .unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Todo),
            priority: Some(TaskPriority::High),
        };
        let page = store
            .list_tasks_by_project(project_id, filter, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.items[0].status, TaskStatus::Todo);
        assert_eq!(page.items[0].priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn test_pagination_totals() {
        let store = InMemoryStore::new();
        let project_id = Uuid::new_v4();
        for _ in 0..5 {
            store
                .save_task(&task(project_id, TaskStatus::Todo, TaskPriority::Medium))
                .await
                .unwrap();
        }

        let page = store
            .list_tasks_by_project(
                project_id,
                TaskFilter::default(),
                PageRequest { page: 1, size: 2 },
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_delete_project_cascades_to_tasks() {
        let store = InMemoryStore::new();
        let project = Project::new("p".to_string(), None, Uuid::new_v4());
        store.save_project(&project).await.unwrap();

        let t = task(project.id, TaskStatus::Todo, TaskPriority::Medium);
        store.save_task(&t).await.unwrap();
        let unrelated = task(Uuid::new_v4(), TaskStatus::Todo, TaskPriority::Medium);
        store.save_task(&unrelated).await.unwrap();

        assert!(store.delete_project(project.id).await.unwrap());
        assert!(store.find_task(t.id).await.unwrap().is_none());
        assert!(store.find_task(unrelated.id).await.unwrap().is_some());

        // Second delete reports nothing removed
        assert!(!store.delete_project(project.id).await.unwrap());
    }
}
