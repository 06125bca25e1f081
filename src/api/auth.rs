use actix_web::{
    post,
    web::{Data, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Postgres};
use tracing::info;
use validator::Validate;

use crate::api::error::ServiceError;
use crate::db::user_repository::UserRepository;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<i32>,
    pub user_id: i32,
}

/// Trivial credential lookup issuing an unverified token
/// (`xxx.<base64 payload>.signature`). Token format and validity carry no
/// correctness guarantees; the real authorization input is the identity
/// headers on each request.
#[post("/login")]
async fn login(
    pool: Data<Pool<Postgres>>,
    req: Json<LoginRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user = UserRepository::find_by_credentials(&pool, &req.email, &req.password)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".to_string()))?;

    info!("User {} logged in as {}", user.email, user.role);

    let payload = serde_json::json!({
        "sub": user.email,
        "role": user.role,
        "exp": chrono::Utc::now().timestamp() + 60 * 60,
    });
    let encoded = base64::engine::general_purpose::STANDARD.encode(payload.to_string());

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: format!("xxx.{encoded}.signature"),
        email: user.email,
        role: user.role,
        company_id: user.company_id,
        agency_id: user.agency_id,
        user_id: user.id,
    }))
}

pub fn auth_config(config: &mut ServiceConfig) {
    config.service(login);
}
