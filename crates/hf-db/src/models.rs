//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`.

use hf_core::{AccountId, FrameId};

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
    pub date_joined: String,
}

impl Account {
    /// Build from a row selected as:
    /// id, username, email, password_hash, first_name, last_name,
    /// is_active, is_staff, is_superuser, last_login, date_joined
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: AccountId::from(row.get::<_, i64>(0)?),
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            first_name: row.get(4)?,
            last_name: row.get(5)?,
            is_active: row.get(6)?,
            is_staff: row.get(7)?,
            is_superuser: row.get(8)?,
            last_login: row.get(9)?,
            date_joined: row.get(10)?,
        })
    }
}

/// Values for inserting a new account; `id` and `date_joined` are assigned
/// by the insert.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,
    pub name: String,
    /// Storage-relative path of the image (e.g. `frames/sunset.jpg`).
    /// Empty when the frame has no stored file.
    pub photo: String,
}

impl Frame {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: FrameId::from(row.get::<_, i64>(0)?),
            name: row.get(1)?,
            photo: row.get(2)?,
        })
    }

    /// Whether a stored file is associated with this frame.
    pub fn has_photo(&self) -> bool {
        !self.photo.is_empty()
    }
}
