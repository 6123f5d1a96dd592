// Service exports
pub mod cache;
pub mod graphql;
pub mod shopify;
pub mod store;

pub use cache::{CacheKey, PetListCache};
pub use shopify::{PetSchema, ShopifyClient};
pub use store::{IndexGuard, PetStore, StoreError};
