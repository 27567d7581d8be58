//! In-process store used when no `DATABASE_URL` is configured, and by the tests.
//!
//! Mirrors the Postgres constraints that the handlers rely on:
//! - `users.email` is unique (-> `RepoError::Conflict`)
//! - `cards.owner` must reference an existing user (-> `RepoError::InvalidReference`)
//! - `likes` behaves as a set

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::repos::card_repo::{Card, CardRepo, NewCard};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::user_repo::{NewUser, User, UserPatch, UserRepo};
use crate::services::object_id::ObjectId;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<ObjectId, User>,
    cards: HashMap<ObjectId, Card>,
}

/// Cheap to clone; all clones share the same tables.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }

    pub async fn card_count(&self) -> usize {
        self.tables.read().await.cards.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn list(&self) -> RepoResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn get(&self, id: ObjectId) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict);
        }

        let id = ObjectId::generate().map_err(RepoError::IdAllocation)?;
        let user = User {
            id,
            name: user.name,
            about: user.about,
            avatar: user.avatar,
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: ObjectId, patch: UserPatch) -> RepoResult<Option<User>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(about) = patch.about {
            user.about = about;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = avatar;
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl CardRepo for MemoryStore {
    async fn list(&self) -> RepoResult<Vec<Card>> {
        Ok(self.tables.read().await.cards.values().cloned().collect())
    }

    async fn get(&self, id: ObjectId) -> RepoResult<Option<Card>> {
        Ok(self.tables.read().await.cards.get(&id).cloned())
    }

    async fn create(&self, card: NewCard) -> RepoResult<Card> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&card.owner) {
            return Err(RepoError::InvalidReference);
        }

        let id = ObjectId::generate().map_err(RepoError::IdAllocation)?;
        let card = Card {
            id,
            name: card.name,
            link: card.link,
            owner: card.owner,
            likes: Vec::new(),
            created_at: Utc::now(),
        };
        tables.cards.insert(id, card.clone());
        Ok(card)
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<Option<Card>> {
        Ok(self.tables.write().await.cards.remove(&id))
    }

    async fn like(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>> {
        let mut tables = self.tables.write().await;
        let Some(card) = tables.cards.get_mut(&id) else {
            return Ok(None);
        };

        if !card.likes.contains(&user) {
            card.likes.push(user);
        }
        Ok(Some(card.clone()))
    }

    async fn unlike(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>> {
        let mut tables = self.tables.write().await;
        let Some(card) = tables.cards.get_mut(&id) else {
            return Ok(None);
        };

        card.likes.retain(|liked| *liked != user);
        Ok(Some(card.clone()))
    }
}
