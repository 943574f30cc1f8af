//! Account CRUD route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use hf_core::AccountId;
use hf_db::models::{Account, NewAccount};

use crate::accounts::{hash_password, normalize_email, normalize_username, unusable_password};
use crate::context::AppContext;
use crate::error::AppError;

/// Account response. The password hash is never exposed.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    pub id: AccountId,
    pub username: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
    pub date_joined: String,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
            first_name: a.first_name,
            last_name: a.last_name,
            is_active: a.is_active,
            is_staff: a.is_staff,
            is_superuser: a.is_superuser,
            last_login: a.last_login,
            date_joined: a.date_joined,
        }
    }
}

/// Request body for creating an account.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateAccountRequest {
    pub email: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

fn default_true() -> bool {
    true
}

/// Request body for updating an account; absent fields are left unchanged.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    /// A blank username clears it.
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// GET /api/accounts/users
#[utoipa::path(
    get,
    path = "/api/accounts/users",
    responses(
        (status = 200, description = "List all accounts", body = Vec<AccountResponse>)
    )
)]
pub async fn list_accounts(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = ctx.accounts.list()?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// POST /api/accounts/users
#[utoipa::path(
    post,
    path = "/api/accounts/users",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid email"),
        (status = 409, description = "Email or username already in use")
    )
)]
pub async fn create_account(
    State(ctx): State<AppContext>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), AppError> {
    let Json(payload) = payload?;
    let email = normalize_email(&payload.email)?;
    let username = normalize_username(payload.username.as_deref());
    let password_hash = match payload.password.as_deref() {
        Some(password) => hash_password(password)?,
        None => unusable_password(),
    };

    let account = ctx.accounts.create(&NewAccount {
        username: username.as_deref(),
        email: &email,
        password_hash: &password_hash,
        first_name: &payload.first_name,
        last_name: &payload.last_name,
        is_active: payload.is_active,
        is_staff: payload.is_staff,
        is_superuser: payload.is_superuser,
    })?;

    tracing::info!(account_id = %account.id, "Created account");
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /api/accounts/users/{id}
#[utoipa::path(
    get,
    path = "/api/accounts/users/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, AppError> {
    let id = parse_account_id(&id)?;
    let account = ctx
        .accounts
        .get(id)?
        .ok_or_else(|| hf_core::Error::not_found("account", id))?;
    Ok(Json(account.into()))
}

/// PUT/PATCH /api/accounts/users/{id}
#[utoipa::path(
    patch,
    path = "/api/accounts/users/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AccountResponse),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Email or username already in use")
    )
)]
pub async fn update_account(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let id = parse_account_id(&id)?;
    let Json(payload) = payload?;
    let mut account = ctx
        .accounts
        .get(id)?
        .ok_or_else(|| hf_core::Error::not_found("account", id))?;

    if let Some(email) = &payload.email {
        account.email = normalize_email(email)?;
    }
    if let Some(username) = &payload.username {
        account.username = normalize_username(Some(username));
    }
    if let Some(password) = &payload.password {
        account.password_hash = hash_password(password)?;
    }
    if let Some(first_name) = payload.first_name {
        account.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        account.last_name = last_name;
    }
    if let Some(is_active) = payload.is_active {
        account.is_active = is_active;
    }
    if let Some(is_staff) = payload.is_staff {
        account.is_staff = is_staff;
    }
    if let Some(is_superuser) = payload.is_superuser {
        account.is_superuser = is_superuser;
    }

    if !ctx.accounts.update(&account)? {
        return Err(hf_core::Error::not_found("account", id).into());
    }
    Ok(Json(account.into()))
}

/// DELETE /api/accounts/users/{id}
#[utoipa::path(
    delete,
    path = "/api/accounts/users/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_account_id(&id)?;
    if !ctx.accounts.delete(id)? {
        return Err(hf_core::Error::not_found("account", id).into());
    }
    tracing::info!(account_id = %id, "Deleted account");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_account_id(raw: &str) -> Result<AccountId, hf_core::Error> {
    raw.parse()
        .map_err(|_| hf_core::Error::not_found("account", raw))
}
