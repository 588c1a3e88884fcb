//! Authentication handlers.

use actix_web::{HttpResponse, web};

use scribe_core::domain::User;
use scribe_shared::dto::{LoginRequest, SignupRequest, TokenResponse, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email,
        created_at: user.created_at,
    }
}

/// POST /api/auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let mut req = body.into_inner();
    req.email = req.email.trim().to_string();
    req.validate().map_err(AppError::Validation)?;

    let user = state.accounts.signup(&req.email, &req.password).await?;

    Ok(HttpResponse::Created().json(to_response(user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let mut req = body.into_inner();
    req.email = req.email.trim().to_string();
    req.validate().map_err(AppError::Validation)?;

    let issued = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(
        issued.access_token,
        u64::try_from(issued.expires_in).unwrap_or(0),
    )))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.accounts.current_user(&identity.claims).await?;

    Ok(HttpResponse::Ok().json(to_response(user)))
}
