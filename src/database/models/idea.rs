use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    /// Build a fresh record owned by `owner`
    pub fn new(draft: IdeaDraft, owner: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            summary: draft.summary,
            tags: draft.tags,
            owner: owner.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner == user_id
    }

    /// Overwrite the editable fields; owner and creation time stay put
    pub fn apply(&mut self, draft: IdeaDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.summary = draft.summary;
        self.tags = draft.tags;
        self.updated_at = Utc::now();
    }
}

/// Validated, normalized editable fields of an idea
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaDraft {
    pub title: String,
    pub description: String,
    pub summary: String,
    pub tags: Vec<String>,
}
