//! Balance report endpoints

use super::SessionClient;
use crate::error::ClientError;
use crate::types::{BalanceReport, DailyBalance};

impl SessionClient {
    /// `GET /v1/balance/calculate/{startDate}/{endDate}/{companyId}`
    pub async fn balance_calculated(
        &self,
        start_date: &str,
        end_date: &str,
        company_id: i64,
    ) -> Result<BalanceReport, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/balance/calculate/{start_date}/{end_date}/{company_id}"),
        );
        self.execute(request).await
    }

    /// `GET /v1/balance/history-seven-days/{companyId}` — the last seven
    /// days excluding today, for the dashboard chart.
    pub async fn last_seven_days_history(
        &self,
        company_id: i64,
    ) -> Result<Vec<DailyBalance>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/v1/balance/history-seven-days/{company_id}"),
        );
        self.execute_list(request).await
    }
}
