//! Repository traits and their SQLite implementations.
//!
//! The server holds `Arc<dyn AccountRepository>` / `Arc<dyn FrameRepository>`
//! handles instead of reaching for the pool directly, so alternative stores
//! (or test doubles) can be injected at construction time.

use hf_core::{AccountId, FrameId, Result};

use crate::models::{Account, Frame, NewAccount};
use crate::pool::{get_conn, DbPool};
use crate::queries::{accounts, frames};

/// Persistence operations for [`Account`] records.
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; uniqueness violations surface as `Error::Conflict`.
    fn create(&self, new: &NewAccount<'_>) -> Result<Account>;
    fn get(&self, id: AccountId) -> Result<Option<Account>>;
    fn get_by_email(&self, email: &str) -> Result<Option<Account>>;
    fn list(&self) -> Result<Vec<Account>>;
    /// Persist every mutable column. Returns false if the account is gone.
    fn update(&self, account: &Account) -> Result<bool>;
    fn delete(&self, id: AccountId) -> Result<bool>;
}

/// Persistence operations for [`Frame`] records.
pub trait FrameRepository: Send + Sync {
    fn create(&self, name: &str, photo: &str) -> Result<Frame>;
    fn get(&self, id: FrameId) -> Result<Option<Frame>>;
    fn list(&self) -> Result<Vec<Frame>>;
    /// Fetch the frames matching `ids`; unknown ids are skipped.
    fn list_by_ids(&self, ids: &[FrameId]) -> Result<Vec<Frame>>;
    fn rename(&self, id: FrameId, name: &str) -> Result<bool>;
    fn delete(&self, id: FrameId) -> Result<bool>;
}

/// [`AccountRepository`] backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: DbPool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn create(&self, new: &NewAccount<'_>) -> Result<Account> {
        let conn = get_conn(&self.pool)?;
        accounts::create_account(&conn, new)
    }

    fn get(&self, id: AccountId) -> Result<Option<Account>> {
        let conn = get_conn(&self.pool)?;
        accounts::get_account(&conn, id)
    }

    fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let conn = get_conn(&self.pool)?;
        accounts::get_account_by_email(&conn, email)
    }

    fn list(&self) -> Result<Vec<Account>> {
        let conn = get_conn(&self.pool)?;
        accounts::list_accounts(&conn)
    }

    fn update(&self, account: &Account) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        accounts::update_account(&conn, account)
    }

    fn delete(&self, id: AccountId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        accounts::delete_account(&conn, id)
    }
}

/// [`FrameRepository`] backed by the SQLite pool.
#[derive(Clone)]
pub struct SqliteFrameRepository {
    pool: DbPool,
}

impl SqliteFrameRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FrameRepository for SqliteFrameRepository {
    fn create(&self, name: &str, photo: &str) -> Result<Frame> {
        let conn = get_conn(&self.pool)?;
        frames::create_frame(&conn, name, photo)
    }

    fn get(&self, id: FrameId) -> Result<Option<Frame>> {
        let conn = get_conn(&self.pool)?;
        frames::get_frame(&conn, id)
    }

    fn list(&self) -> Result<Vec<Frame>> {
        let conn = get_conn(&self.pool)?;
        frames::list_frames(&conn)
    }

    fn list_by_ids(&self, ids: &[FrameId]) -> Result<Vec<Frame>> {
        let conn = get_conn(&self.pool)?;
        frames::list_frames_by_ids(&conn, ids)
    }

    fn rename(&self, id: FrameId, name: &str) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        frames::rename_frame(&conn, id, name)
    }

    fn delete(&self, id: FrameId) -> Result<bool> {
        let conn = get_conn(&self.pool)?;
        frames::delete_frame(&conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use std::sync::Arc;

    #[test]
    fn frame_repository_through_trait_object() {
        let repo: Arc<dyn FrameRepository> =
            Arc::new(SqliteFrameRepository::new(init_memory_pool().unwrap()));
        let f = repo.create("lake", "frames/lake.jpg").unwrap();
        assert_eq!(repo.list().unwrap().len(), 1);
        assert!(repo.rename(f.id, "Lake").unwrap());
        assert_eq!(repo.get(f.id).unwrap().unwrap().name, "Lake");
        assert!(repo.delete(f.id).unwrap());
        assert!(repo.list_by_ids(&[f.id]).unwrap().is_empty());
    }

    #[test]
    fn account_repository_through_trait_object() {
        let repo: Arc<dyn AccountRepository> =
            Arc::new(SqliteAccountRepository::new(init_memory_pool().unwrap()));
        let a = repo
            .create(&NewAccount {
                username: None,
                email: "repo@example.com",
                password_hash: "!",
                first_name: "",
                last_name: "",
                is_active: true,
                is_staff: false,
                is_superuser: false,
            })
            .unwrap();
        assert_eq!(repo.get_by_email("repo@example.com").unwrap().unwrap().id, a.id);
        assert!(repo.delete(a.id).unwrap());
        assert!(repo.get(a.id).unwrap().is_none());
    }
}
