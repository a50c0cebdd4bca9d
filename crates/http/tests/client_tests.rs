//! Integration tests for the session-aware HTTP client

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::json;
use std::sync::Arc;
use tally_core::{AuthState, Role, Session, SessionError, SessionStore};
use tally_http::client::{ClientBuilder, SessionClient};
use tally_http::error::ClientError;
use tally_http::types::{TransactionFilter, TransactionStatus, TransactionType};
use tally_http::CompanyCache;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mint_token(email: &str, role: &str, exp: i64) -> String {
    let claims = json!({
        "sub": email,
        "roles": role,
        "exp": exp,
        "firstName": "Ana",
        "lastName": "Lima",
        "companyId": 1
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .unwrap()
}

fn seeded_session(access_token: &str, expires_at: i64) -> Session {
    Session {
        access_token: access_token.to_string(),
        refresh_token: "refresh-1".to_string(),
        email: "ana@example.com".to_string(),
        role: Role::Admin,
        expires_at,
        first_name: None,
        last_name: None,
        company_id: Some(1),
        last_error: None,
    }
}

fn client_for(uri: &str, store: Arc<SessionStore>) -> SessionClient {
    ClientBuilder::new()
        .base_url(uri)
        .refresh_skew_secs(60)
        .build_session(store)
        .unwrap()
}

fn far_future() -> i64 {
    Utc::now().timestamp() + 3600
}

#[tokio::test]
async fn login_builds_session_from_token_claims() {
    let server = MockServer::start().await;
    let access = mint_token("ana@example.com", "ADMIN", far_future());

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "refreshToken": "refresh-1"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    let client = client_for(&server.uri(), store.clone());

    let session = client.login("ana@example.com", "secret").await.unwrap();
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.email, "ana@example.com");
    assert_eq!(session.company_id, Some(1));

    let stored = store.get().unwrap();
    assert_eq!(stored.access_token, access);
    assert_eq!(stored.refresh_token, "refresh-1");
    assert!(matches!(
        AuthState::resolve(&store),
        AuthState::Authenticated { role: Role::Admin }
    ));
}

#[tokio::test]
async fn rejected_login_maps_to_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    let client = client_for(&server.uri(), store.clone());

    let result = client.login("ana@example.com", "wrong").await;
    assert!(matches!(result, Err(ClientError::InvalidCredentials(_))));
    // no partial session is persisted
    assert!(store.get().is_none());
}

#[tokio::test]
async fn bearer_token_is_attached_to_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products/company/1"))
        .and(header("authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    let products = client.products_by_company(1).await.unwrap();
    assert!(products.is_empty());
}

#[tokio::test]
async fn fresh_session_makes_no_refresh_call() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/company/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    client.users_by_company(1).await.unwrap();
}

#[tokio::test]
async fn stale_session_refreshes_before_the_request() {
    let server = MockServer::start().await;
    let new_access = mint_token("ana@example.com", "ADMIN", far_future());

    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": new_access,
            "refreshToken": "refresh-2"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/company/1"))
        .and(header("authorization", format!("Bearer {new_access}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    // expires within the 60s skew window
    store.set(seeded_session("stale-token", Utc::now().timestamp() + 10));
    let client = client_for(&server.uri(), store.clone());

    client.users_by_company(1).await.unwrap();

    let refreshed = store.get().unwrap();
    assert_eq!(refreshed.access_token, new_access);
    assert_eq!(refreshed.refresh_token, "refresh-2");
    assert_eq!(refreshed.last_error, None);
}

#[tokio::test]
async fn refresh_keeps_previous_refresh_token_when_response_omits_it() {
    let server = MockServer::start().await;
    let new_access = mint_token("ana@example.com", "ADMIN", far_future());

    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "accessToken": new_access })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/company/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("stale-token", Utc::now().timestamp() + 10));
    let client = client_for(&server.uri(), store.clone());

    client.users_by_company(1).await.unwrap();
    assert_eq!(store.get().unwrap().refresh_token, "refresh-1");
}

#[tokio::test]
async fn request_is_retried_once_with_the_refreshed_token() {
    let server = MockServer::start().await;
    let new_access = mint_token("ana@example.com", "ADMIN", far_future());

    // the seeded token is fresh by expiry but no longer accepted
    Mock::given(method("GET"))
        .and(path("/v1/categories/company/1"))
        .and(header("authorization", "Bearer revoked-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/categories/company/1"))
        .and(header("authorization", format!("Bearer {new_access}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": new_access,
            "refreshToken": "refresh-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("revoked-token", far_future()));
    let client = client_for(&server.uri(), store);

    let categories = client.categories_by_company(1).await.unwrap();
    assert!(categories.is_empty());
}

#[tokio::test]
async fn second_401_surfaces_without_looping() {
    let server = MockServer::start().await;
    let new_access = mint_token("ana@example.com", "ADMIN", far_future());

    Mock::given(method("GET"))
        .and(path("/v1/users/company/1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(2)
        .mount(&server)
        .await;
    // the refresh succeeds, so exactly one retry happens and then the
    // second 401 is surfaced
    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": new_access,
            "refreshToken": "refresh-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("revoked-token", far_future()));
    let client = client_for(&server.uri(), store);

    let result = client.users_by_company(1).await;
    assert!(matches!(result, Err(ClientError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn failed_refresh_signs_the_session_out() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("stale-token", Utc::now().timestamp() + 10));
    let client = client_for(&server.uri(), store.clone());

    let result = client.users_by_company(1).await;
    assert!(matches!(result, Err(ClientError::Server { status: 500, .. })));

    let session = store.get().unwrap();
    assert_eq!(session.last_error, Some(SessionError::RefreshFailed));
    assert!(session.access_token.is_empty());
    assert_eq!(AuthState::resolve(&store), AuthState::Unauthenticated);
}

#[tokio::test]
async fn concurrent_stale_detections_share_one_refresh() {
    let server = MockServer::start().await;
    let new_access = mint_token("ana@example.com", "ADMIN", far_future());

    Mock::given(method("PUT"))
        .and(path("/v1/auth/refresh/ana@example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_millis(50))
                .set_body_json(json!({
                    "accessToken": new_access,
                    "refreshToken": "refresh-2"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/company/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/products/company/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/purchases/company/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("stale-token", Utc::now().timestamp() + 10));
    let client = client_for(&server.uri(), store.clone());

    let (users, products, purchases) = tokio::join!(
        client.users_by_company(1),
        client.products_by_company(1),
        client.purchases_by_company(1),
    );
    users.unwrap();
    products.unwrap();
    purchases.unwrap();

    assert_eq!(store.get().unwrap().access_token, new_access);
}

#[tokio::test]
async fn no_content_yields_an_empty_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/transactions/company/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    let transactions = client.transactions_by_company(1).await.unwrap();
    assert!(transactions.is_empty());
}

#[tokio::test]
async fn transaction_filter_builds_query_from_set_fields_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/transactions/filter"))
        .and(query_param("type", "FIXED_EXPENSE"))
        .and(query_param("status", "PENDING"))
        .and(query_param("categoryId", "3"))
        .and(query_param("minValue", "10.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    let filter = TransactionFilter {
        kind: Some(TransactionType::FixedExpense),
        status: Some(TransactionStatus::Pending),
        category_id: Some(3),
        min_value: Some(10.5),
        ..Default::default()
    };
    client.filter_transactions(&filter).await.unwrap();
}

#[tokio::test]
async fn password_recovery_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/password/forgot"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "e-mail sent" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/password/reset"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "password updated" })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    let client = client_for(&server.uri(), store);
    let public = client.to_public();

    let forgot = public.forgot_password("ana@example.com").await.unwrap();
    assert_eq!(forgot.message, "e-mail sent");

    let reset = public
        .reset_password("recovery-token", "new-password")
        .await
        .unwrap();
    assert_eq!(reset.message, "password updated");
}

#[tokio::test]
async fn cache_fetches_through_and_refetches_after_invalidation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/company/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "firstName": "Ana",
            "lastName": "Lima",
            "email": "ana@example.com",
            "role": "ADMIN",
            "companyId": 1,
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-01T00:00:00Z"
        }])))
        .expect(2)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let cache = CompanyCache::new(client_for(&server.uri(), store), 1);

    let first = cache.users().await.unwrap();
    let second = cache.users().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    cache.invalidate(tally_http::EntityKind::Users).await;
    let third = cache.users().await.unwrap();
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].email, "ana@example.com");
}

#[tokio::test]
async fn create_transaction_posts_the_installment_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/transactions"))
        .and(wiremock::matchers::body_partial_json(json!({
            "type": "FIXED_EXPENSE",
            "totalInstallments": 12,
            "isFixed": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "type": "FIXED_EXPENSE",
            "amount": 120.0,
            "date": "2026-03-01",
            "categoryId": 3,
            "userId": 2,
            "companyId": 1,
            "status": "PENDING",
            "createdBy": 2,
            "createdAt": "2026-03-01T00:00:00Z",
            "updatedAt": "2026-03-01T00:00:00Z",
            "installmentNumber": 1,
            "totalInstallments": 12,
            "isFixed": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    let payload = tally_http::types::TransactionPayload {
        id: None,
        kind: TransactionType::FixedExpense,
        status: TransactionStatus::Pending,
        amount: 120.0,
        date: "2026-03-01".into(),
        due_date: None,
        description: None,
        category_id: 3,
        user_id: Some(2),
        company_id: Some(1),
        fee: None,
        created_by: 2,
        total_installments: Some(12),
        is_fixed: Some(false),
    };
    let created = client.create_transaction(&payload).await.unwrap();
    assert_eq!(created.installment_number, Some(1));
    assert_eq!(created.total_installments, Some(12));
}

#[tokio::test]
async fn delete_ignores_the_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/transactions/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    client.delete_transaction(9).await.unwrap();
}

#[tokio::test]
async fn server_errors_surface_without_a_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users/email/ana@example.com"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store);

    let result = client.user_by_email("ana@example.com").await;
    assert!(matches!(result, Err(ClientError::Server { status: 500, .. })));
}

#[tokio::test]
async fn sign_out_destroys_the_session() {
    let server = MockServer::start().await;
    let store = Arc::new(SessionStore::new());
    store.set(seeded_session("valid-token", far_future()));
    let client = client_for(&server.uri(), store.clone());

    client.sign_out();
    assert!(store.get().is_none());
    assert_eq!(AuthState::resolve(&store), AuthState::Unauthenticated);
}
