use std::sync::Arc;

use crate::core::fields;
use crate::error::ProxyError;
use crate::models::{customer_gid, metaobject_gid, ImageUpload, PetData, PetProfile};
use crate::services::{IndexGuard, PetListCache, PetStore, StoreError};

/// How new pets are appended to a customer's index
#[derive(Debug, Clone, Copy)]
pub struct IndexPolicy {
    /// Send the index digest with every write and retry when it is stale.
    /// Without it, concurrent creates for one customer can drop an entry.
    pub guarded: bool,
    pub max_attempts: u32,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        Self {
            guarded: true,
            max_attempts: 3,
        }
    }
}

/// Pet profile operations on top of the upstream store
///
/// # Operations
/// 1. Create: store the pet, then link it into the customer's index
/// 2. List: walk the customer's index and fetch each pet
/// 3. Delete: remove the pet; the index entry is left for List to skip
#[derive(Clone)]
pub struct PetService {
    store: Arc<dyn PetStore>,
    cache: Option<PetListCache>,
    policy: IndexPolicy,
}

impl PetService {
    pub fn new(store: Arc<dyn PetStore>, cache: Option<PetListCache>, policy: IndexPolicy) -> Self {
        Self { store, cache, policy }
    }

    /// Create a pet profile for a customer and link it into their index
    pub async fn create(
        &self,
        customer_id: &str,
        pet_data: Option<PetData>,
        image: Option<ImageUpload>,
    ) -> Result<PetProfile, ProxyError> {
        let pet_data = match pet_data {
            Some(data) if !customer_id.trim().is_empty() => data,
            _ => {
                return Err(ProxyError::MissingField(
                    "customer_id and pet_data are required".to_string(),
                ))
            }
        };

        let customer = customer_gid(customer_id);
        let mut details = pet_data.into_details().map_err(ProxyError::InvalidPetData)?;

        if let Some(upload) = image {
            details.image = Some(self.store.upload_image(upload).await?);
        }

        let created = self
            .store
            .create_pet(fields::to_metaobject_fields(&customer, &details))
            .await?;

        tracing::info!("Created pet {} ({}) for {}", created.id, details.name, customer);

        let profile = fields::from_metaobject(&created).unwrap_or_else(|e| {
            tracing::debug!("Created pet did not echo its fields ({}), using submitted data", e);
            PetProfile {
                id: created.id.clone(),
                handle: created.handle.clone(),
                customer_id: Some(customer.clone()),
                details,
            }
        });

        self.append_to_index(&customer, &profile.id).await?;

        if let Some(cache) = &self.cache {
            cache.invalidate_customer(&customer).await;
        }

        Ok(profile)
    }

    /// List a customer's pets in index order
    ///
    /// Ids that no longer resolve to a valid pet are skipped.
    pub async fn list(&self, customer_id: &str) -> Result<Vec<PetProfile>, ProxyError> {
        if customer_id.trim().is_empty() {
            return Err(ProxyError::MissingField("customer_id is required".to_string()));
        }

        let customer = customer_gid(customer_id);

        if let Some(cache) = &self.cache {
            if let Some(pets) = cache.get(&customer).await {
                return Ok((*pets).clone());
            }
        }

        let generation = self.cache.as_ref().map(PetListCache::generation);
        let index = self.store.read_index(&customer).await?;

        let mut seen: Vec<&str> = Vec::with_capacity(index.ids.len());
        let mut pets = Vec::with_capacity(index.ids.len());

        for id in &index.ids {
            if seen.contains(&id.as_str()) {
                continue;
            }
            seen.push(id);

            match self.store.fetch_pet(id).await {
                Ok(Some(object)) => match fields::from_metaobject(&object) {
                    Ok(pet) => pets.push(pet),
                    Err(e) => tracing::warn!("Skipping unreadable pet {}: {}", id, e),
                },
                Ok(None) => tracing::debug!("Pet {} no longer exists, skipping", id),
                Err(e) => tracing::warn!("Failed to fetch pet {}, skipping: {}", id, e),
            }
        }

        tracing::info!(
            "Listed {} pets for {} ({} indexed)",
            pets.len(),
            customer,
            index.ids.len()
        );

        if let (Some(cache), Some(generation)) = (&self.cache, generation) {
            cache.insert(&customer, pets.clone(), generation).await;
        }

        Ok(pets)
    }

    /// Delete a pet profile
    pub async fn delete(&self, pet_id: &str) -> Result<String, ProxyError> {
        if pet_id.trim().is_empty() {
            return Err(ProxyError::MissingField("pet id is required".to_string()));
        }

        let id = metaobject_gid(pet_id);
        let deleted_id = self.store.delete_pet(&id).await?;

        tracing::info!("Deleted pet {}", deleted_id);

        if let Some(cache) = &self.cache {
            cache.invalidate_pet(&deleted_id).await;
        }

        Ok(deleted_id)
    }

    /// Append a pet id to the customer's index unless it is already there
    async fn append_to_index(&self, customer: &str, pet_id: &str) -> Result<(), ProxyError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let index = self.store.read_index(customer).await?;
            if index.ids.iter().any(|id| id == pet_id) {
                return Ok(());
            }

            let guard = if self.policy.guarded {
                IndexGuard::Expect(index.digest)
            } else {
                IndexGuard::Unguarded
            };
            let mut ids = index.ids;
            ids.push(pet_id.to_string());

            match self.store.write_index(customer, &ids, guard).await {
                Ok(()) => {
                    tracing::debug!("Linked {} to {} ({} pets)", pet_id, customer, ids.len());
                    return Ok(());
                }
                Err(StoreError::StaleIndex) if attempt < self.policy.max_attempts => {
                    tracing::debug!(
                        "Pet index for {} changed while linking {}, retrying ({}/{})",
                        customer,
                        pet_id,
                        attempt,
                        self.policy.max_attempts
                    );
                }
                Err(StoreError::StaleIndex) => {
                    return Err(ProxyError::IndexContention(customer.to_string()));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
