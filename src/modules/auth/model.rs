use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::User;

/// Sign-in request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Sign-in response with the token pair and the signed-in user
#[derive(Debug, Serialize, ToSchema)]
pub struct SignInResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Session-recovery request carrying the refresh token
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Session-recovery response; tokens are rotated on every refresh
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of a session re-validation check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub valid: bool,
}

/// Generic message payload
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
