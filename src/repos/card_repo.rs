/*
 * Responsibility
 * - The card store interface (CardRepo)
 * - Postgres implementation over the cards table (likes kept as a TEXT[] set)
 * - owner is a FK to users; a dangling owner comes back as InvalidReference
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};
use crate::services::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: ObjectId,
    pub name: String,
    pub link: String,
    pub owner: ObjectId,
    pub likes: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub name: String,
    pub link: String,
    pub owner: ObjectId,
}

#[async_trait]
pub trait CardRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<Card>>;
    async fn get(&self, id: ObjectId) -> RepoResult<Option<Card>>;
    async fn create(&self, card: NewCard) -> RepoResult<Card>;
    /// Returns the removed card, `None` if it did not exist.
    async fn delete(&self, id: ObjectId) -> RepoResult<Option<Card>>;
    /// Adds `user` to the like set (no-op when already present).
    async fn like(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>>;
    async fn unlike(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>>;
}

#[derive(Debug, FromRow)]
struct CardRow {
    id: String,
    name: String,
    link: String,
    owner: String,
    likes: Vec<String>,
    created_at: DateTime<Utc>,
}

fn parse_id(column: &str, value: &str) -> RepoResult<ObjectId> {
    ObjectId::parse(value).map_err(|e| RepoError::Corrupt(format!("cards.{column}: {e}")))
}

impl TryFrom<CardRow> for Card {
    type Error = RepoError;

    fn try_from(row: CardRow) -> RepoResult<Self> {
        let likes = row
            .likes
            .iter()
            .map(|v| parse_id("likes", v))
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(Card {
            id: parse_id("id", &row.id)?,
            name: row.name,
            link: row.link,
            owner: parse_id("owner", &row.owner)?,
            likes,
            created_at: row.created_at,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgCardRepo {
    pool: PgPool,
}

impl PgCardRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardRepo for PgCardRepo {
    async fn list(&self) -> RepoResult<Vec<Card>> {
        let rows = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, name, link, owner, likes, created_at
            FROM cards
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(Card::try_from).collect()
    }

    async fn get(&self, id: ObjectId) -> RepoResult<Option<Card>> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            SELECT id, name, link, owner, likes, created_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(Card::try_from).transpose()
    }

    async fn create(&self, card: NewCard) -> RepoResult<Card> {
        let id = ObjectId::generate().map_err(RepoError::IdAllocation)?;

        let row = sqlx::query_as::<_, CardRow>(
            r#"
            INSERT INTO cards (id, name, link, owner)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, link, owner, likes, created_at
            "#,
        )
        .bind(id.to_hex())
        .bind(&card.name)
        .bind(&card.link)
        .bind(card.owner.to_hex())
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Card::try_from(row)
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<Option<Card>> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            DELETE FROM cards
            WHERE id = $1
            RETURNING id, name, link, owner, likes, created_at
            "#,
        )
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(Card::try_from).transpose()
    }

    async fn like(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            UPDATE cards
            SET likes = CASE
                WHEN $2 = ANY(likes) THEN likes
                ELSE array_append(likes, $2)
            END
            WHERE id = $1
            RETURNING id, name, link, owner, likes, created_at
            "#,
        )
        .bind(id.to_hex())
        .bind(user.to_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(Card::try_from).transpose()
    }

    async fn unlike(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>> {
        let row = sqlx::query_as::<_, CardRow>(
            r#"
            UPDATE cards
            SET likes = array_remove(likes, $2)
            WHERE id = $1
            RETURNING id, name, link, owner, likes, created_at
            "#,
        )
        .bind(id.to_hex())
        .bind(user.to_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(Card::try_from).transpose()
    }
}
