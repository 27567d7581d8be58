/*
 * Responsibility
 * - The "authenticated subject" type handlers see
 * - The authentication stage stores it in request extensions; handlers only receive this type
 *
 * Notes
 * - Token verification lives in middleware/services; this is only the contract
 * - Lifetime is one request; nothing here is persisted or shared across requests
 */
use crate::services::object_id::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: ObjectId,
}

impl Identity {
    pub fn new(user_id: ObjectId) -> Self {
        Self { user_id }
    }

    /// Ownership rule for destructive card operations.
    pub fn owns(&self, owner: ObjectId) -> bool {
        self.user_id == owner
    }
}
