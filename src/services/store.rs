use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ImageUpload, Metaobject, MetaobjectField, PetIndex};

/// Errors that can occur when talking to the upstream store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    HttpStatus(u16),

    #[error("GraphQL errors: {0}")]
    GraphqlError(String),

    /// Validation errors reported by a mutation; messages are safe to show callers
    #[error("{0}")]
    UserErrors(String),

    #[error("Pet index was modified concurrently")]
    StaleIndex,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Image upload failed: {0}")]
    UploadFailed(String),
}

/// How an index write guards against concurrent modification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexGuard {
    /// Overwrite whatever is stored
    Unguarded,
    /// Write only if the stored digest still matches; `None` means
    /// the index must not exist yet
    Expect(Option<String>),
}

/// Upstream operations needed by the pet service
#[async_trait]
pub trait PetStore: Send + Sync {
    /// Create a pet metaobject from its fields
    async fn create_pet(&self, fields: Vec<MetaobjectField>) -> Result<Metaobject, StoreError>;

    /// Fetch a pet metaobject, `None` if it does not exist
    async fn fetch_pet(&self, id: &str) -> Result<Option<Metaobject>, StoreError>;

    /// Delete a pet metaobject, returning the deleted id
    async fn delete_pet(&self, id: &str) -> Result<String, StoreError>;

    /// Read the customer's pet index
    async fn read_index(&self, customer_id: &str) -> Result<PetIndex, StoreError>;

    /// Replace the customer's pet index
    async fn write_index(
        &self,
        customer_id: &str,
        ids: &[String],
        guard: IndexGuard,
    ) -> Result<(), StoreError>;

    /// Upload an image and return a reference usable as a pet's `image` field
    async fn upload_image(&self, upload: ImageUpload) -> Result<String, StoreError>;
}
