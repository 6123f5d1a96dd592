use serde::{Deserialize, Serialize};
use crate::models::domain::PetProfile;

/// Response for the create endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePetResponse {
    pub success: bool,
    pub metaobject_id: String,
    pub pet_data: PetProfile,
}

/// Response for the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPetsResponse {
    pub pets: Vec<PetProfile>,
}

/// Response for the delete endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePetResponse {
    pub success: bool,
    pub deleted_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
