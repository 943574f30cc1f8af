//! Account CRUD operations.

use chrono::Utc;
use hf_core::{AccountId, Error, Result};
use rusqlite::Connection;

use crate::models::{Account, NewAccount};

const COLS: &str = "id, username, email, password_hash, first_name, last_name, \
                    is_active, is_staff, is_superuser, last_login, date_joined";

/// Translate a write failure into a [`Error::Conflict`] when it was caused by
/// one of the account uniqueness constraints.
fn map_write_error(e: rusqlite::Error, username: Option<&str>, email: &str) -> Error {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed: accounts.email") {
        Error::Conflict(format!("An account with email '{email}' already exists"))
    } else if msg.contains("UNIQUE constraint failed: accounts.username") {
        Error::Conflict(format!(
            "An account with username '{}' already exists",
            username.unwrap_or_default()
        ))
    } else {
        Error::database(msg)
    }
}

/// Create a new account and return it.
pub fn create_account(conn: &Connection, new: &NewAccount<'_>) -> Result<Account> {
    let date_joined = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO accounts (username, email, password_hash, first_name, last_name,
                               is_active, is_staff, is_superuser, date_joined)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            new.username,
            new.email,
            new.password_hash,
            new.first_name,
            new.last_name,
            new.is_active,
            new.is_staff,
            new.is_superuser,
            date_joined,
        ],
    )
    .map_err(|e| map_write_error(e, new.username, new.email))?;

    Ok(Account {
        id: AccountId::from(conn.last_insert_rowid()),
        username: new.username.map(String::from),
        email: new.email.to_string(),
        password_hash: new.password_hash.to_string(),
        first_name: new.first_name.to_string(),
        last_name: new.last_name.to_string(),
        is_active: new.is_active,
        is_staff: new.is_staff,
        is_superuser: new.is_superuser,
        last_login: None,
        date_joined,
    })
}

/// Get an account by primary key.
pub fn get_account(conn: &Connection, id: AccountId) -> Result<Option<Account>> {
    let q = format!("SELECT {COLS} FROM accounts WHERE id = ?1");
    let result = conn.query_row(&q, [id.get()], Account::from_row);
    match result {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Get an account by its (already normalised) email.
pub fn get_account_by_email(conn: &Connection, email: &str) -> Result<Option<Account>> {
    let q = format!("SELECT {COLS} FROM accounts WHERE email = ?1");
    let result = conn.query_row(&q, [email], Account::from_row);
    match result {
        Ok(a) => Ok(Some(a)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all accounts ordered by id.
pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let q = format!("SELECT {COLS} FROM accounts ORDER BY id ASC");
    let mut stmt = conn.prepare(&q).map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Account::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Overwrite every mutable column of an account. Returns false if no row has
/// `account.id`.
pub fn update_account(conn: &Connection, account: &Account) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE accounts
             SET username = ?1, email = ?2, password_hash = ?3, first_name = ?4,
                 last_name = ?5, is_active = ?6, is_staff = ?7, is_superuser = ?8,
                 last_login = ?9
             WHERE id = ?10",
            rusqlite::params![
                account.username,
                account.email,
                account.password_hash,
                account.first_name,
                account.last_name,
                account.is_active,
                account.is_staff,
                account.is_superuser,
                account.last_login,
                account.id.get(),
            ],
        )
        .map_err(|e| map_write_error(e, account.username.as_deref(), &account.email))?;
    Ok(n > 0)
}

/// Delete an account by ID. Returns true if a row was deleted.
pub fn delete_account(conn: &Connection, id: AccountId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM accounts WHERE id = ?1", [id.get()])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}
