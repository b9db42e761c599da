pub use crate::tasks::repo_types::{Priority, Task};
use crate::tasks::dto::TaskFilter;
use sqlx::PgPool;
use uuid::Uuid;

impl Task {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        priority: Priority,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, priority)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, is_completed, priority,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(priority)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    /// List the caller's tasks, newest first. Refinements are applied only
    /// when bound non-null; the owner scope is unconditional.
    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        filter: &TaskFilter,
    ) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, priority,
                   created_at, updated_at
            FROM tasks
            WHERE user_id = $1
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
              AND ($3::boolean IS NULL OR is_completed = $3)
              AND ($4::priority IS NULL OR priority = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.search.as_deref())
        .bind(filter.is_completed)
        .bind(filter.priority)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Lookup by id alone; the ownership check happens in the handler so a
    /// missing record and a foreign record answer differently.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, is_completed, priority,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Persist the merged state of an already-loaded task.
    pub async fn save(&self, db: &PgPool) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                is_completed = $4,
                priority = $5,
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, title, description, is_completed, priority,
                      created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&self.title)
        .bind(self.description.as_deref())
        .bind(self.is_completed)
        .bind(self.priority)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;
    use crate::tasks::dto::UpdateTaskRequest;

    async fn seed_user(db: &PgPool, email: &str) -> User {
        User::create(db, "Test", email, "$argon2id$v=19$not-a-real-hash")
            .await
            .expect("seed user")
    }

    #[sqlx::test]
    async fn list_is_owner_scoped_and_newest_first(db: PgPool) {
        let alice = seed_user(&db, "alice@example.com").await;
        let bob = seed_user(&db, "bob@example.com").await;

        // Explicit timestamps so the expected order never ties.
        for (title, age_minutes) in [("oldest", 30), ("middle", 20), ("newest", 10)] {
            sqlx::query(
                r#"
                INSERT INTO tasks (user_id, title, created_at)
                VALUES ($1, $2, now() - make_interval(mins => $3))
                "#,
            )
            .bind(alice.id)
            .bind(title)
            .bind(age_minutes as i32)
            .execute(&db)
            .await
            .expect("insert");
        }
        Task::create(&db, bob.id, "bob task", None, Priority::Low)
            .await
            .expect("create");

        let tasks = Task::list_by_user(&db, alice.id, &TaskFilter::default())
            .await
            .expect("list");
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);
        assert!(tasks.iter().all(|t| t.user_id == alice.id));
    }

    #[sqlx::test]
    async fn filters_combine_as_a_conjunction(db: PgPool) {
        let user = seed_user(&db, "carol@example.com").await;

        let mut matching = Task::create(&db, user.id, "ship release", None, Priority::High)
            .await
            .expect("create");
        matching.is_completed = true;
        let matching = matching.save(&db).await.expect("save");

        Task::create(&db, user.id, "high but open", None, Priority::High)
            .await
            .expect("create");
        let mut low_done = Task::create(&db, user.id, "low and done", None, Priority::Low)
            .await
            .expect("create");
        low_done.is_completed = true;
        low_done.save(&db).await.expect("save");

        let filter = TaskFilter {
            search: None,
            is_completed: Some(true),
            priority: Some(Priority::High),
        };
        let tasks = Task::list_by_user(&db, user.id, &filter).await.expect("list");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, matching.id);
    }

    #[sqlx::test]
    async fn search_matches_title_or_description_case_insensitively(db: PgPool) {
        let user = seed_user(&db, "dave@example.com").await;
        Task::create(&db, user.id, "Buy MILK", None, Priority::Medium)
            .await
            .expect("create");
        Task::create(&db, user.id, "errands", Some("milk and eggs"), Priority::Medium)
            .await
            .expect("create");
        Task::create(&db, user.id, "unrelated", None, Priority::Medium)
            .await
            .expect("create");

        let filter = TaskFilter {
            search: Some("milk".into()),
            ..Default::default()
        };
        let tasks = Task::list_by_user(&db, user.id, &filter).await.expect("list");
        assert_eq!(tasks.len(), 2);
    }

    #[sqlx::test]
    async fn second_delete_finds_nothing(db: PgPool) {
        let user = seed_user(&db, "erin@example.com").await;
        let task = Task::create(&db, user.id, "one shot", None, Priority::Medium)
            .await
            .expect("create");

        assert_eq!(Task::delete(&db, task.id).await.expect("delete"), 1);
        assert!(Task::find_by_id(&db, task.id).await.expect("find").is_none());
        assert_eq!(Task::delete(&db, task.id).await.expect("delete"), 0);
    }

    #[sqlx::test]
    async fn completion_update_preserves_title_and_priority(db: PgPool) {
        let user = seed_user(&db, "fay@example.com").await;
        let task = Task::create(&db, user.id, "Buy milk", None, Priority::Low)
            .await
            .expect("create");

        let mut loaded = Task::find_by_id(&db, task.id)
            .await
            .expect("find")
            .expect("present");
        UpdateTaskRequest {
            is_completed: Some(true),
            ..Default::default()
        }
        .apply(&mut loaded);
        loaded.save(&db).await.expect("save");

        let listed = Task::list_by_user(&db, user.id, &TaskFilter::default())
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Buy milk");
        assert_eq!(listed[0].priority, Priority::Low);
        assert!(listed[0].is_completed);
    }
}
