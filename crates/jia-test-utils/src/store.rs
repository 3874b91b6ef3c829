//! In-memory customer store double.

use async_trait::async_trait;
use chrono::Utc;
use jia_client::{CustomerStore, StoreError};
use jia_protocol::{Customer, CustomerDraft};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

/// Store backed by a vector, assigning ids and timestamps like the real
/// store. Call counters support cache and idempotence assertions.
#[derive(Default)]
pub struct InMemoryCustomerStore {
    customers: RwLock<Vec<Customer>>,
    next_id: AtomicI64,
    list_calls: AtomicUsize,
    count_calls: AtomicUsize,
    create_calls: AtomicUsize,
    unavailable: AtomicBool,
    reject_creates: AtomicBool,
}

impl InMemoryCustomerStore {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Store seeded with the given customers.
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let next_id = customers.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            customers: RwLock::new(customers),
            next_id: AtomicI64::new(next_id),
            ..Self::default()
        }
    }

    /// Snapshot of the stored customers.
    pub fn customers(&self) -> Vec<Customer> {
        self.customers.read().clone()
    }

    /// Number of `list_customers` calls so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `count_customers` calls so far.
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(Ordering::SeqCst)
    }

    /// Number of `create_customer` calls so far.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Make every operation fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make creations fail with a `Validation` error.
    pub fn set_reject_creates(&self, reject: bool) {
        self.reject_creates.store(reject, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let mut customers = self.customers.read().clone();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn count_customers(&self) -> Result<u64, StoreError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.customers.read().len() as u64)
    }

    async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if self.reject_creates.load(Ordering::SeqCst) {
            return Err(StoreError::Validation(
                "record violates a store constraint".to_string(),
            ));
        }
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "null value in column \"name\"".to_string(),
            ));
        }
        let customer = Customer {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: draft.name.clone(),
            company: draft.company.clone(),
            gst_number: draft.gst_number.clone(),
            pan_number: draft.pan_number.clone(),
            address: draft.address.clone(),
            email_address: draft.email_address.clone(),
            phone_number: draft.phone_number.clone(),
            created_at: Utc::now(),
        };
        self.customers.write().push(customer.clone());
        Ok(customer)
    }
}
