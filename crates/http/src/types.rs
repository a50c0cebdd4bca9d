//! Wire types for the backend REST API
//!
//! Field names follow the backend's camelCase JSON. All entity copies are
//! transient and non-authoritative; the backend owns the data.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair returned by login and refresh. The refresh endpoint may omit
/// the refresh token, in which case the previous one stays valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub company_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update payload; `id` is set only on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub company_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Expense,
    Income,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    /// Highlighted on the dashboard summaries
    pub emphasis: bool,
    pub company_id: i64,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub user_id: i64,
    pub emphasis: bool,
    pub company_id: i64,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub company_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub code: String,
    pub company_id: i64,
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: i64,
    pub company_id: i64,
    pub user_id: i64,
    pub created_by: i64,
    pub date: String,
    pub total: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub company_id: i64,
    pub user_id: i64,
    pub created_by: i64,
    pub date: String,
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    VariableIncome,
    FixedIncome,
    VariableExpense,
    FixedExpense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: i64,
    pub user_id: i64,
    pub company_id: i64,
    pub status: TransactionStatus,
    #[serde(default)]
    pub fee: Option<f64>,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
    /// Position within an installment series, e.g. 1 of 12
    #[serde(default)]
    pub installment_number: Option<u32>,
    #[serde(default)]
    pub total_installments: Option<u32>,
    /// Recurring fixed entry
    #[serde(default)]
    pub is_fixed: bool,
}

/// Create/update payload. `total_installments` asks the backend to generate
/// the installment records; this client never expands installments itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub amount: f64,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    pub created_by: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_installments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fixed: Option<bool>,
}

/// Query for `GET /v1/transactions/filter`. Unset fields are omitted from
/// the query string.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

/// Per-category rollup inside a balance report. The backend speaks
/// Portuguese on this endpoint; renames keep the Rust side uniform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub total: f64,
    #[serde(rename = "tipo")]
    pub kind: CategoryType,
    #[serde(rename = "destaque")]
    pub emphasis: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    #[serde(rename = "receita")]
    pub revenue: f64,
    #[serde(rename = "compras")]
    pub purchases: f64,
    #[serde(rename = "despesas")]
    pub expenses: f64,
    #[serde(rename = "taxas")]
    pub fees: f64,
    #[serde(rename = "saldoFinal")]
    pub final_balance: f64,
    #[serde(rename = "topReceitas")]
    pub top_income: Vec<CategorySummary>,
    #[serde(rename = "topDespesas")]
    pub top_expenses: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBalance {
    pub date: String,
    #[serde(rename = "receita")]
    pub revenue: f64,
    #[serde(rename = "despesa")]
    pub expense: f64,
    #[serde(rename = "saldo")]
    pub balance: f64,
}
