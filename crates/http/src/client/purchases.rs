//! Purchase endpoints

use super::SessionClient;
use crate::error::ClientError;
use crate::types::{Purchase, PurchasePayload};

impl SessionClient {
    /// `GET /v1/purchases/company/{companyId}`
    pub async fn purchases_by_company(
        &self,
        company_id: i64,
    ) -> Result<Vec<Purchase>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/purchases/company/{company_id}"),
        );
        self.execute_list(request).await
    }

    /// `POST /v1/purchases`
    pub async fn create_purchase(&self, payload: &PurchasePayload) -> Result<Purchase, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/purchases")
            .json(payload);
        self.execute(request).await
    }

    /// `PUT /v1/purchases`
    pub async fn update_purchase(&self, payload: &PurchasePayload) -> Result<Purchase, ClientError> {
        let request = self
            .request(reqwest::Method::PUT, "/v1/purchases")
            .json(payload);
        self.execute(request).await
    }

    /// `DELETE /v1/purchases/{id}`
    pub async fn delete_purchase(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::DELETE, &format!("/v1/purchases/{id}"));
        self.execute_unit(request).await
    }
}
