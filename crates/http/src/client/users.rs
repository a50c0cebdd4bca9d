//! User endpoints

use super::SessionClient;
use crate::error::ClientError;
use crate::types::{User, UserPayload};

impl SessionClient {
    /// `GET /v1/users/company/{companyId}`
    pub async fn users_by_company(&self, company_id: i64) -> Result<Vec<User>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/users/company/{company_id}"),
        );
        self.execute_list(request).await
    }

    /// `GET /v1/users/email/{email}`
    pub async fn user_by_email(&self, email: &str) -> Result<User, ClientError> {
        let request = self.request(reqwest::Method::GET, &format!("/v1/users/email/{email}"));
        self.execute(request).await
    }

    /// `POST /v1/users`
    pub async fn create_user(&self, payload: &UserPayload) -> Result<User, ClientError> {
        let request = self.request(reqwest::Method::POST, "/v1/users").json(payload);
        self.execute(request).await
    }

    /// `PUT /v1/users`
    pub async fn update_user(&self, payload: &UserPayload) -> Result<User, ClientError> {
        let request = self.request(reqwest::Method::PUT, "/v1/users").json(payload);
        self.execute(request).await
    }

    /// `DELETE /v1/users/{id}`
    pub async fn delete_user(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::DELETE, &format!("/v1/users/{id}"));
        self.execute_unit(request).await
    }
}
