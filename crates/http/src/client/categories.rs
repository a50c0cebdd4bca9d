//! Category endpoints

use super::SessionClient;
use crate::error::ClientError;
use crate::types::{Category, CategoryPayload};

impl SessionClient {
    /// `GET /v1/categories/company/{companyId}`
    pub async fn categories_by_company(
        &self,
        company_id: i64,
    ) -> Result<Vec<Category>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/categories/company/{company_id}"),
        );
        self.execute_list(request).await
    }

    /// `POST /v1/categories`
    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<Category, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/categories")
            .json(payload);
        self.execute(request).await
    }

    /// `PUT /v1/categories`
    pub async fn update_category(&self, payload: &CategoryPayload) -> Result<Category, ClientError> {
        let request = self
            .request(reqwest::Method::PUT, "/v1/categories")
            .json(payload);
        self.execute(request).await
    }

    /// `DELETE /v1/categories/{id}`
    pub async fn delete_category(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::DELETE, &format!("/v1/categories/{id}"));
        self.execute_unit(request).await
    }
}
