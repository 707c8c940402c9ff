//! Auth endpoints

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, ApiRequest, Gateway};
use crate::models::{AuthResponse, LoginInput, RegisterInput, User};

/// Login, registration, and credential validation.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, input: &LoginInput) -> Result<AuthResponse, ApiError>;
    async fn register(&self, input: &RegisterInput) -> Result<AuthResponse, ApiError>;

    /// "Who am I" for the stored credential.
    async fn me(&self) -> Result<User, ApiError>;
}

/// HTTP implementation of [`AuthApi`].
pub struct HttpAuthApi {
    gateway: Arc<Gateway>,
}

impl HttpAuthApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, input: &LoginInput) -> Result<AuthResponse, ApiError> {
        let body = Gateway::to_body(input)?;
        self.gateway
            .send_json(ApiRequest::post("/api/auth/login").no_auth().json(body))
            .await
    }

    async fn register(&self, input: &RegisterInput) -> Result<AuthResponse, ApiError> {
        let body = Gateway::to_body(input)?;
        self.gateway
            .send_json(ApiRequest::post("/api/auth/register").no_auth().json(body))
            .await
    }

    async fn me(&self) -> Result<User, ApiError> {
        self.gateway.send_json(ApiRequest::get("/api/auth/me")).await
    }
}
