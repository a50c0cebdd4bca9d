//! Product endpoints

use super::SessionClient;
use crate::error::ClientError;
use crate::types::{Product, ProductPayload};

impl SessionClient {
    /// `GET /v1/products/company/{companyId}`
    pub async fn products_by_company(&self, company_id: i64) -> Result<Vec<Product>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/products/company/{company_id}"),
        );
        self.execute_list(request).await
    }

    /// `POST /v1/products`
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/products")
            .json(payload);
        self.execute(request).await
    }

    /// `PUT /v1/products`
    pub async fn update_product(&self, payload: &ProductPayload) -> Result<Product, ClientError> {
        let request = self
            .request(reqwest::Method::PUT, "/v1/products")
            .json(payload);
        self.execute(request).await
    }

    /// `DELETE /v1/products/{id}`
    pub async fn delete_product(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::DELETE, &format!("/v1/products/{id}"));
        self.execute_unit(request).await
    }
}
