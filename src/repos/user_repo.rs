/*
 * Responsibility
 * - The user store interface (UserRepo) the handlers talk to
 * - Postgres implementation over the users table
 * - Store failures come back as RepoError (unique email -> Conflict)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};
use crate::services::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: ObjectId,
    pub name: String,
    pub about: String,
    pub avatar: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub about: String,
    pub avatar: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields left as `None` are kept as stored.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<User>>;
    async fn get(&self, id: ObjectId) -> RepoResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    async fn create(&self, user: NewUser) -> RepoResult<User>;
    async fn update(&self, id: ObjectId, patch: UserPatch) -> RepoResult<Option<User>>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    name: String,
    about: String,
    avatar: String,
    email: String,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> RepoResult<Self> {
        let id = ObjectId::parse(&row.id).map_err(|e| RepoError::Corrupt(format!("users.id: {e}")))?;
        Ok(User {
            id,
            name: row.name,
            about: row.about,
            avatar: row.avatar,
            email: row.email,
            password_hash: row.password_hash,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn list(&self) -> RepoResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, about, avatar, email, password_hash
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn get(&self, id: ObjectId) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, about, avatar, email, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.to_hex())
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, about, avatar, email, password_hash
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let id = ObjectId::generate().map_err(RepoError::IdAllocation)?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, name, about, avatar, email, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, about, avatar, email, password_hash
            "#,
        )
        .bind(id.to_hex())
        .bind(&user.name)
        .bind(&user.about)
        .bind(&user.avatar)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        User::try_from(row)
    }

    async fn update(&self, id: ObjectId, patch: UserPatch) -> RepoResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                about = COALESCE($3, about),
                avatar = COALESCE($4, avatar)
            WHERE id = $1
            RETURNING id, name, about, avatar, email, password_hash
            "#,
        )
        .bind(id.to_hex())
        .bind(patch.name)
        .bind(patch.about)
        .bind(patch.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        row.map(User::try_from).transpose()
    }
}
