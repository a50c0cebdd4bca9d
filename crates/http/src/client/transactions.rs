//! Transaction endpoints

use super::SessionClient;
use crate::error::ClientError;
use crate::types::{Transaction, TransactionFilter, TransactionPayload};

impl SessionClient {
    /// `GET /v1/transactions/company/{companyId}`
    pub async fn transactions_by_company(
        &self,
        company_id: i64,
    ) -> Result<Vec<Transaction>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/transactions/company/{company_id}"),
        );
        self.execute_list(request).await
    }

    /// `GET /v1/transactions/filter?...` — unset filter fields are left
    /// out of the query string.
    pub async fn filter_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, ClientError> {
        let request = self
            .request(reqwest::Method::GET, "/v1/transactions/filter")
            .query(filter);
        self.execute_list(request).await
    }

    /// `POST /v1/transactions`. When the payload carries
    /// `total_installments`, the backend generates the installment rows.
    pub async fn create_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/v1/transactions")
            .json(payload);
        self.execute(request).await
    }

    /// `PUT /v1/transactions`
    pub async fn update_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<Transaction, ClientError> {
        let request = self
            .request(reqwest::Method::PUT, "/v1/transactions")
            .json(payload);
        self.execute(request).await
    }

    /// `DELETE /v1/transactions/{id}`
    pub async fn delete_transaction(&self, id: i64) -> Result<(), ClientError> {
        let request = self.request(reqwest::Method::DELETE, &format!("/v1/transactions/{id}"));
        self.execute_unit(request).await
    }
}
