// In-memory stand-in for the Shopify store

#![allow(dead_code)]

use async_trait::async_trait;
use pet_profile_proxy::models::{ImageUpload, Metaobject, MetaobjectField, PetIndex};
use pet_profile_proxy::services::{IndexGuard, PetStore, StoreError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    next_id: u64,
    pets: HashMap<String, Metaobject>,
    indexes: HashMap<String, (Vec<String>, u64)>,
    broken_pets: HashSet<String>,
    reject_creates: Option<String>,
    always_stale: bool,
    fail_index_reads: bool,
    uploads: Vec<String>,
    index_writes: usize,
}

/// Every operation yields once before touching state, so concurrent calls
/// interleave the way separate requests would.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self, customer: &str) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .indexes
            .get(customer)
            .map(|(ids, _)| ids.clone())
            .unwrap_or_default()
    }

    pub fn set_index(&self, customer: &str, ids: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let ids = ids.iter().map(|s| s.to_string()).collect();
        let version = state.indexes.get(customer).map_or(1, |(_, v)| v + 1);
        state.indexes.insert(customer.to_string(), (ids, version));
    }

    pub fn insert_pet(&self, object: Metaobject) {
        self.state.lock().unwrap().pets.insert(object.id.clone(), object);
    }

    /// Remove a pet without touching any index
    pub fn remove_pet(&self, id: &str) {
        self.state.lock().unwrap().pets.remove(id);
    }

    pub fn pet_count(&self) -> usize {
        self.state.lock().unwrap().pets.len()
    }

    /// Make fetches of this id fail with an upstream error
    pub fn break_pet(&self, id: &str) {
        self.state.lock().unwrap().broken_pets.insert(id.to_string());
    }

    pub fn reject_creates(&self, message: &str) {
        self.state.lock().unwrap().reject_creates = Some(message.to_string());
    }

    pub fn always_stale(&self) {
        self.state.lock().unwrap().always_stale = true;
    }

    pub fn fail_index_reads(&self) {
        self.state.lock().unwrap().fail_index_reads = true;
    }

    pub fn uploads(&self) -> Vec<String> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn index_writes(&self) -> usize {
        self.state.lock().unwrap().index_writes
    }
}

#[async_trait]
impl PetStore for MemoryStore {
    async fn create_pet(&self, fields: Vec<MetaobjectField>) -> Result<Metaobject, StoreError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();

        if let Some(message) = &state.reject_creates {
            return Err(StoreError::UserErrors(message.clone()));
        }

        state.next_id += 1;
        let object = Metaobject {
            id: format!("gid://shopify/Metaobject/{}", state.next_id),
            handle: Some(format!("pet-profile-{}", state.next_id)),
            fields,
        };
        state.pets.insert(object.id.clone(), object.clone());
        Ok(object)
    }

    async fn fetch_pet(&self, id: &str) -> Result<Option<Metaobject>, StoreError> {
        tokio::task::yield_now().await;
        let state = self.state.lock().unwrap();

        if state.broken_pets.contains(id) {
            return Err(StoreError::HttpStatus(502));
        }
        Ok(state.pets.get(id).cloned())
    }

    async fn delete_pet(&self, id: &str) -> Result<String, StoreError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();

        match state.pets.remove(id) {
            Some(_) => Ok(id.to_string()),
            None => Err(StoreError::UserErrors("Record not found".to_string())),
        }
    }

    async fn read_index(&self, customer_id: &str) -> Result<PetIndex, StoreError> {
        tokio::task::yield_now().await;
        let state = self.state.lock().unwrap();

        if state.fail_index_reads {
            return Err(StoreError::GraphqlError("Throttled".to_string()));
        }

        Ok(match state.indexes.get(customer_id) {
            Some((ids, version)) => PetIndex {
                ids: ids.clone(),
                digest: Some(format!("v{}", version)),
            },
            None => PetIndex::default(),
        })
    }

    async fn write_index(
        &self,
        customer_id: &str,
        ids: &[String],
        guard: IndexGuard,
    ) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();

        if let IndexGuard::Expect(expected) = guard {
            let current = state
                .indexes
                .get(customer_id)
                .map(|(_, v)| format!("v{}", v));
            if state.always_stale || current != expected {
                return Err(StoreError::StaleIndex);
            }
        }

        let version = state.indexes.get(customer_id).map_or(1, |(_, v)| v + 1);
        state.indexes.insert(customer_id.to_string(), (ids.to_vec(), version));
        state.index_writes += 1;
        Ok(())
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<String, StoreError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock().unwrap();

        let id = format!("gid://shopify/MediaImage/{}", state.uploads.len() + 1);
        state.uploads.push(upload.filename);
        Ok(id)
    }
}
