//! Filterable customer directory backing the list view and sidebar badge.
//!
//! Filtering is one logical operation with two backing implementations:
//! an in-memory pass over the cached master list, or a server-side name
//! search routed through the assistant backend. Both must produce the
//! same result set for equivalent inputs.

use crate::cache::{CacheControl, Cached};
use crate::debounce::QueryDebouncer;
use async_trait::async_trait;
use jia_client::{AssistantService, CustomerStore, StoreError};
use jia_protocol::Customer;
use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;

/// Which filtering implementation the directory uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Substring match across all fields of the cached master list.
    ClientSide,
    /// Name search delegated to the assistant backend.
    ServerSide,
}

/// One filtering strategy over the customer collection.
#[async_trait]
pub trait FilterBackend: Send + Sync {
    /// Produce the customers matching a non-empty query.
    async fn filter(&self, query: &str) -> Result<Vec<Customer>, StoreError>;
}

/// Case-insensitive substring match across a customer's searchable fields.
pub fn matches_query(customer: &Customer, query: &str) -> bool {
    let needle = query.to_lowercase();
    let mut haystacks = vec![customer.name.as_str()];
    for field in [
        &customer.company,
        &customer.email_address,
        &customer.phone_number,
        &customer.gst_number,
        &customer.pan_number,
        &customer.address,
    ] {
        if let Some(value) = field {
            haystacks.push(value.as_str());
        }
    }
    haystacks
        .iter()
        .any(|value| value.to_lowercase().contains(&needle))
}

/// Master list fetched once per cache generation and shared between the
/// directory and the client-side filter.
struct MasterList {
    store: Arc<dyn CustomerStore>,
    caches: Arc<CacheControl>,
    cache: Mutex<Cached<Vec<Customer>>>,
}

impl MasterList {
    async fn get(&self) -> Result<Vec<Customer>, StoreError> {
        let generation = self.caches.generation();
        if let Some(cached) = self.cache.lock().get(generation) {
            return Ok(cached.clone());
        }
        debug!("refreshing master customer list (generation={generation})");
        let fresh = self.store.list_customers().await?;
        self.cache.lock().put(generation, fresh.clone());
        Ok(fresh)
    }
}

/// Filters the cached master list in memory.
struct ClientSideFilter {
    master: Arc<MasterList>,
}

#[async_trait]
impl FilterBackend for ClientSideFilter {
    async fn filter(&self, query: &str) -> Result<Vec<Customer>, StoreError> {
        let master = self.master.get().await?;
        Ok(master
            .into_iter()
            .filter(|customer| matches_query(customer, query))
            .collect())
    }
}

/// Delegates to the assistant backend's server-side name search.
struct AssistantSearchFilter {
    assistant: Arc<dyn AssistantService>,
}

#[async_trait]
impl FilterBackend for AssistantSearchFilter {
    async fn filter(&self, query: &str) -> Result<Vec<Customer>, StoreError> {
        self.assistant
            .search_customers(query)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}

/// Read view over the customer collection with cached list and count.
pub struct CustomerDirectory {
    master: Arc<MasterList>,
    backend: Box<dyn FilterBackend>,
    store: Arc<dyn CustomerStore>,
    caches: Arc<CacheControl>,
    count: Mutex<Cached<u64>>,
    debouncer: QueryDebouncer,
}

impl CustomerDirectory {
    /// Build a directory using the selected filtering strategy.
    pub fn new(
        store: Arc<dyn CustomerStore>,
        assistant: Arc<dyn AssistantService>,
        caches: Arc<CacheControl>,
        mode: FilterMode,
    ) -> Self {
        let master = Arc::new(MasterList {
            store: store.clone(),
            caches: caches.clone(),
            cache: Mutex::new(Cached::new()),
        });
        let backend: Box<dyn FilterBackend> = match mode {
            FilterMode::ClientSide => Box::new(ClientSideFilter {
                master: master.clone(),
            }),
            FilterMode::ServerSide => Box::new(AssistantSearchFilter { assistant }),
        };
        Self {
            master,
            backend,
            store,
            caches,
            count: Mutex::new(Cached::new()),
            debouncer: QueryDebouncer::default(),
        }
    }

    /// List customers, optionally filtered by a query.
    ///
    /// A blank filter returns the full master list (cached per generation);
    /// a non-empty filter goes through the configured backend.
    pub async fn customers(&self, filter: Option<&str>) -> Result<Vec<Customer>, StoreError> {
        match filter.map(str::trim).filter(|query| !query.is_empty()) {
            None => self.master.get().await,
            Some(query) => {
                debug!("filtering customers (query_len={})", query.len());
                self.backend.filter(query).await
            }
        }
    }

    /// Total record count for the sidebar badge, cached per generation.
    pub async fn count(&self) -> Result<u64, StoreError> {
        let generation = self.caches.generation();
        if let Some(count) = self.count.lock().get(generation) {
            return Ok(*count);
        }
        let fresh = self.store.count_customers().await?;
        self.count.lock().put(generation, fresh);
        Ok(fresh)
    }

    /// Debounced filtering for keystroke-driven surfaces.
    ///
    /// Returns `None` when a newer query superseded this one during the
    /// debounce window.
    pub async fn filter_debounced(
        &self,
        query: &str,
    ) -> Option<Result<Vec<Customer>, StoreError>> {
        if !self.debouncer.settle().await {
            return None;
        }
        Some(self.customers(Some(query)).await)
    }
}
