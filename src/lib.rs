//! Pet Profile Proxy - pet profiles for a Shopify storefront
//!
//! Stores each pet as a Shopify metaobject and links it to its owner through
//! a customer metafield holding the ordered list of pet ids. The service
//! itself owns no persistent state.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{IndexPolicy, PetService};
pub use error::ProxyError;
pub use models::{PetDetails, PetProfile, PetType, WeightCategory, HealthBoost, CreatePetRequest, PetData};
pub use services::{PetListCache, PetStore, ShopifyClient, StoreError};
