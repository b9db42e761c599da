use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Task priority; stored as the `priority` Postgres enum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "priority")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Task record in the database. `user_id` is the owner and never changes
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: Priority,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), r#""High""#);
        let p: Priority = serde_json::from_str(r#""Low""#).unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Buy milk".into(),
            description: None,
            is_completed: false,
            priority: Priority::Low,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&task).expect("serialize");
        assert!(json.contains("\"isCompleted\":false"));
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"createdAt\""));
    }
}
