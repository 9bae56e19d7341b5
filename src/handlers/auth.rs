use crate::dtos::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{Account, Role};
use crate::startup::AppState;
use crate::utils::{hash_password, verify_password, Password, PasswordHashString, ValidatedJson};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use mongodb::bson::doc;

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role: Role = req
        .role
        .parse()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Role must be student or faculty")))?;

    // Email only has to be unique within the role partition; the same
    // address may hold both a student and a faculty account.
    let existing = state
        .db
        .accounts(role)
        .find_one(doc! { "email": &req.email }, None)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "An account with this email already exists"
        )));
    }

    let hash = hash_password(&Password::new(req.password))?;
    let account = Account::new(req.name, req.email, hash.into_string(), role);

    state.db.accounts(role).insert_one(&account, None).await?;

    tracing::info!(
        account_id = %account.id,
        role = %role.as_str(),
        "Account registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user: AccountResponse::from(account),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Uniform failure for bad role, unknown email and wrong password, so
    // responses cannot be used to enumerate accounts.
    let auth_failed = || AppError::AuthError(anyhow::anyhow!("Invalid email or password"));

    let role: Role = req.role.parse().map_err(|_| auth_failed())?;

    let account = state
        .db
        .accounts(role)
        .find_one(doc! { "email": &req.email }, None)
        .await?
        .ok_or_else(auth_failed)?;

    let hash = PasswordHashString::new(account.password_hash.clone());
    if !verify_password(&Password::new(req.password), &hash) {
        return Err(auth_failed());
    }

    tracing::info!(account_id = %account.id, role = %role.as_str(), "Login successful");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: AccountResponse::from(account),
    }))
}
