use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Idea, IdeaDraft};

/// CRUD access to the idea collection.
///
/// Mutations take the owner alongside the id and only touch a record whose
/// owner matches, so a caller that checked ownership on a loaded copy can never
/// act on a record that changed hands or vanished in between.
#[async_trait]
pub trait IdeaStore: Send + Sync {
    /// Newest first, capped at `limit` when given
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Idea>, DatabaseError>;

    async fn find(&self, id: Uuid) -> Result<Option<Idea>, DatabaseError>;

    async fn insert(&self, draft: IdeaDraft, owner: &str) -> Result<Idea, DatabaseError>;

    /// `None` when no record with this id belongs to `owner`
    async fn update_owned(
        &self,
        id: Uuid,
        owner: &str,
        draft: IdeaDraft,
    ) -> Result<Option<Idea>, DatabaseError>;

    /// `false` when no record with this id belongs to `owner`
    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn close(&self);
}

const IDEA_COLUMNS: &str = "id, title, description, summary, tags, owner, created_at, updated_at";

/// `$1` is the cap; binding NULL lifts it
fn list_sql() -> String {
    format!("SELECT {} FROM ideas ORDER BY created_at DESC LIMIT $1", IDEA_COLUMNS)
}

fn find_sql() -> String {
    format!("SELECT {} FROM ideas WHERE id = $1", IDEA_COLUMNS)
}

fn insert_sql() -> String {
    format!(
        "INSERT INTO ideas ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
        IDEA_COLUMNS, IDEA_COLUMNS
    )
}

fn update_sql() -> String {
    format!(
        "UPDATE ideas \
         SET title = $3, description = $4, summary = $5, tags = $6, updated_at = now() \
         WHERE id = $1 AND owner = $2 \
         RETURNING {}",
        IDEA_COLUMNS
    )
}

const DELETE_SQL: &str = "DELETE FROM ideas WHERE id = $1 AND owner = $2";

/// PostgreSQL-backed [`IdeaStore`]
pub struct PgIdeaStore {
    db: DatabaseManager,
}

impl PgIdeaStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdeaStore for PgIdeaStore {
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Idea>, DatabaseError> {
        let ideas = sqlx::query_as::<_, Idea>(&list_sql())
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?;
        Ok(ideas)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Idea>, DatabaseError> {
        let idea = sqlx::query_as::<_, Idea>(&find_sql())
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(idea)
    }

    async fn insert(&self, draft: IdeaDraft, owner: &str) -> Result<Idea, DatabaseError> {
        let idea = Idea::new(draft, owner);
        let stored = sqlx::query_as::<_, Idea>(&insert_sql())
            .bind(idea.id)
            .bind(&idea.title)
            .bind(&idea.description)
            .bind(&idea.summary)
            .bind(&idea.tags)
            .bind(&idea.owner)
            .bind(idea.created_at)
            .bind(idea.updated_at)
            .fetch_one(self.db.pool())
            .await?;
        Ok(stored)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: &str,
        draft: IdeaDraft,
    ) -> Result<Option<Idea>, DatabaseError> {
        let updated = sqlx::query_as::<_, Idea>(&update_sql())
            .bind(id)
            .bind(owner)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.summary)
            .bind(&draft.tags)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(updated)
    }

    async fn delete_owned(&self, id: Uuid, owner: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(id)
            .bind(owner)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.db.health_check().await
    }

    async fn close(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_orders_newest_first_with_bound_limit() {
        let sql = list_sql();
        assert!(sql.starts_with("SELECT id, title,"));
        assert!(sql.ends_with("FROM ideas ORDER BY created_at DESC LIMIT $1"));
    }

    #[test]
    fn insert_binds_every_column() {
        let sql = insert_sql();
        let columns = IDEA_COLUMNS.split(", ").count();
        let placeholders = (1..=columns).map(|n| format!("${}", n)).collect::<Vec<_>>().join(", ");
        assert!(sql.contains(&format!("VALUES ({})", placeholders)), "{}", sql);
        assert!(sql.ends_with(&format!("RETURNING {}", IDEA_COLUMNS)));
    }

    #[test]
    fn mutations_are_conditioned_on_owner() {
        let update = update_sql();
        assert!(update.contains("WHERE id = $1 AND owner = $2"), "{}", update);
        assert!(update.contains("updated_at = now()"));
        assert!(!update.contains("created_at ="), "created_at must never be rewritten");
        assert!(DELETE_SQL.ends_with("WHERE id = $1 AND owner = $2"));
        assert_eq!(find_sql(), format!("SELECT {} FROM ideas WHERE id = $1", IDEA_COLUMNS));
    }
}
