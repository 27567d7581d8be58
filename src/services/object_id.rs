/*
 * Responsibility
 * - Record identifiers shared by users and cards (12 bytes, 24 lowercase hex chars on the wire)
 * - Ids only enter through parse() (path segments, token subjects, store rows); serde is output-only
 * - generate / parse / format live here so the store format is changed in one place
 * - Validators and extractors use parse(); repos use generate()
 *
 * Why not thiserror:
 * - The error type is local to this module and small
 */
use std::{error::Error, fmt};

use serde::{Serialize, Serializer};

pub const OBJECT_ID_LEN: usize = 12;
pub const OBJECT_ID_HEX_LEN: usize = OBJECT_ID_LEN * 2;

pub type Result<T> = std::result::Result<T, ObjectIdError>;

#[derive(Debug)]
pub enum ObjectIdError {
    InvalidLength { len: usize },
    InvalidHex,
    Entropy(String),
}

impl fmt::Display for ObjectIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectIdError::InvalidLength { len } => {
                write!(f, "id must be {} hex chars, got {}", OBJECT_ID_HEX_LEN, len)
            }
            ObjectIdError::InvalidHex => write!(f, "id is not valid hex"),
            ObjectIdError::Entropy(e) => write!(f, "failed to read random bytes: {}", e),
        }
    }
}

impl Error for ObjectIdError {}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// 4-byte big-endian unix timestamp followed by 8 random bytes.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        let secs = chrono::Utc::now().timestamp() as u32;
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        getrandom::fill(&mut bytes[4..]).map_err(|e| ObjectIdError::Entropy(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != OBJECT_ID_HEX_LEN {
            return Err(ObjectIdError::InvalidLength { len: s.len() });
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ObjectIdError::InvalidHex)?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectId").field(&self.to_hex()).finish()
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}
