//! Per-company entity cache with explicit invalidation
//!
//! Views hold only transient copies of backend data. Instead of the
//! side-channel "bump a counter to force a reload" pattern, consumers call
//! [`CompanyCache::invalidate`] after a mutation and the next read
//! refetches. Last fetch wins; there are no other consistency guarantees.

use crate::client::SessionClient;
use crate::error::ClientError;
use crate::types::{Category, Product, Purchase, Transaction, User};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Entity kinds the cache tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Users,
    Categories,
    Products,
    Purchases,
    Transactions,
}

#[derive(Default)]
struct Slots {
    users: Option<Arc<Vec<User>>>,
    categories: Option<Arc<Vec<Category>>>,
    products: Option<Arc<Vec<Product>>>,
    purchases: Option<Arc<Vec<Purchase>>>,
    transactions: Option<Arc<Vec<Transaction>>>,
}

/// Fetch-through cache over the company-scoped list endpoints.
pub struct CompanyCache {
    client: SessionClient,
    company_id: i64,
    slots: RwLock<Slots>,
}

impl CompanyCache {
    pub fn new(client: SessionClient, company_id: i64) -> Self {
        Self {
            client,
            company_id,
            slots: RwLock::new(Slots::default()),
        }
    }

    pub fn company_id(&self) -> i64 {
        self.company_id
    }

    /// Users for the company, fetched on first read.
    pub async fn users(&self) -> Result<Arc<Vec<User>>, ClientError> {
        if let Some(cached) = self.slots.read().await.users.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.client.users_by_company(self.company_id).await?);
        self.slots.write().await.users = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, ClientError> {
        if let Some(cached) = self.slots.read().await.categories.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.client.categories_by_company(self.company_id).await?);
        self.slots.write().await.categories = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn products(&self) -> Result<Arc<Vec<Product>>, ClientError> {
        if let Some(cached) = self.slots.read().await.products.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.client.products_by_company(self.company_id).await?);
        self.slots.write().await.products = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn purchases(&self) -> Result<Arc<Vec<Purchase>>, ClientError> {
        if let Some(cached) = self.slots.read().await.purchases.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.client.purchases_by_company(self.company_id).await?);
        self.slots.write().await.purchases = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn transactions(&self) -> Result<Arc<Vec<Transaction>>, ClientError> {
        if let Some(cached) = self.slots.read().await.transactions.clone() {
            return Ok(cached);
        }
        let fetched = Arc::new(self.client.transactions_by_company(self.company_id).await?);
        self.slots.write().await.transactions = Some(fetched.clone());
        Ok(fetched)
    }

    /// Drop the cached list for one entity kind so the next read refetches.
    pub async fn invalidate(&self, kind: EntityKind) {
        let mut slots = self.slots.write().await;
        match kind {
            EntityKind::Users => slots.users = None,
            EntityKind::Categories => slots.categories = None,
            EntityKind::Products => slots.products = None,
            EntityKind::Purchases => slots.purchases = None,
            EntityKind::Transactions => slots.transactions = None,
        }
    }

    /// Drop everything, e.g. after switching sessions.
    pub async fn invalidate_all(&self) {
        *self.slots.write().await = Slots::default();
    }
}
