use serde::{Deserialize, Serialize};

use crate::tasks::repo_types::{Priority, Task};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
}

/// Partial update. Text fields and priority use falsy-fallback semantics
/// (empty or omitted keeps the stored value, so neither can be cleared here);
/// `is_completed` applies whenever present, including explicit `false`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub priority: Option<Priority>,
}

impl UpdateTaskRequest {
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description.filter(|d| !d.is_empty()) {
            task.description = Some(description);
        }
        if let Some(is_completed) = self.is_completed {
            task.is_completed = is_completed;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

/// Listing refinements; all optional and independently combinable. The base
/// owner scope is not part of this struct — it always comes from the token.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFilter {
    pub search: Option<String>,
    pub is_completed: Option<bool>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub message: String,
}
