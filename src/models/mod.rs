// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    customer_gid, metaobject_gid, HealthBoost, ImageUpload, Metaobject, MetaobjectField,
    PetDetails, PetIndex, PetProfile, PetType, WeightCategory,
};
pub use requests::{CreatePetRequest, ListPetsQuery, PetData};
pub use responses::{CreatePetResponse, DeletePetResponse, ErrorResponse, HealthResponse, ListPetsResponse};
