use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Idea, IdeaDraft};
use crate::database::repository::IdeaStore;

/// Process-local [`IdeaStore`], used when no database is configured
#[derive(Default)]
pub struct MemoryIdeaStore {
    ideas: RwLock<Vec<Idea>>,
}

impl MemoryIdeaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.ideas.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ideas.read().await.is_empty()
    }
}

#[async_trait]
impl IdeaStore for MemoryIdeaStore {
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Idea>, DatabaseError> {
        let ideas = self.ideas.read().await;

        // Insertion order reversed, so equal timestamps still come out newest first
        let mut sorted: Vec<Idea> = ideas.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = limit.and_then(|n| usize::try_from(n).ok()) {
            sorted.truncate(limit);
        }
        Ok(sorted)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Idea>, DatabaseError> {
        let ideas = self.ideas.read().await;
        Ok(ideas.iter().find(|idea| idea.id == id).cloned())
    }

    async fn insert(&self, draft: IdeaDraft, owner: &str) -> Result<Idea, DatabaseError> {
        let idea = Idea::new(draft, owner);
        self.ideas.write().await.push(idea.clone());
        Ok(idea)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: &str,
        draft: IdeaDraft,
    ) -> Result<Option<Idea>, DatabaseError> {
        let mut ideas = self.ideas.write().await;
        match ideas
            .iter_mut()
            .find(|idea| idea.id == id && idea.is_owned_by(owner))
        {
            Some(idea) => {
                idea.apply(draft);
                Ok(Some(idea.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError> {
        let mut ideas = self.ideas.write().await;
        let before = ideas.len();
        ideas.retain(|idea| !(idea.id == id && idea.is_owned_by(owner)));
        Ok(ideas.len() < before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn close(&self) {}
}
