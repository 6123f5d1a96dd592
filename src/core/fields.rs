//! Translation between pet records and metaobject fields.

use chrono::NaiveDate;

use crate::models::requests::normalize_allergies;
use crate::models::{
    HealthBoost, Metaobject, MetaobjectField, PetDetails, PetProfile, PetType, WeightCategory,
};

pub const CUSTOMER_ID: &str = "customer_id";
pub const NAME: &str = "name";
pub const TYPE: &str = "type";
pub const BIRTHDAY: &str = "birthday";
pub const BREED: &str = "breed";
pub const WEIGHT: &str = "weight";
pub const ALLERGIES: &str = "allergies";
pub const HEALTH_BOOST: &str = "health_boost";
pub const IMAGE: &str = "image";

/// Build the metaobject fields for a new pet
///
/// Every key is always sent; absent optional values go out as empty strings.
pub fn to_metaobject_fields(customer_id: &str, details: &PetDetails) -> Vec<MetaobjectField> {
    let allergies = serde_json::to_string(&details.allergies).unwrap_or_else(|_| "[]".to_string());

    vec![
        MetaobjectField::new(CUSTOMER_ID, customer_id),
        MetaobjectField::new(NAME, details.name.as_str()),
        MetaobjectField::new(TYPE, details.pet_type.as_str()),
        MetaobjectField::new(
            BIRTHDAY,
            details
                .birthday
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ),
        MetaobjectField::new(BREED, details.breed.clone().unwrap_or_default()),
        MetaobjectField::new(WEIGHT, details.weight.as_str()),
        MetaobjectField::new(ALLERGIES, allergies),
        MetaobjectField::new(
            HEALTH_BOOST,
            details.health_boost.map(|h| h.as_str()).unwrap_or_default(),
        ),
        MetaobjectField::new(IMAGE, details.image.clone().unwrap_or_default()),
    ]
}

/// Parse a stored metaobject back into a pet profile
pub fn from_metaobject(object: &Metaobject) -> Result<PetProfile, String> {
    let name = object
        .field(NAME)
        .map(|n| n.trim().to_string())
        .ok_or_else(|| format!("{} has no name", object.id))?;

    let pet_type = object
        .field(TYPE)
        .ok_or_else(|| format!("{} has no type", object.id))?
        .parse::<PetType>()?;

    let weight = object
        .field(WEIGHT)
        .ok_or_else(|| format!("{} has no weight", object.id))?
        .parse::<WeightCategory>()?;

    // Optional fields edited outside this service may hold values we don't
    // know; the pet is still listed without them.
    let birthday = object.field(BIRTHDAY).and_then(|b| match b.parse::<NaiveDate>() {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!("Ignoring birthday '{}' on {}: {}", b, object.id, e);
            None
        }
    });

    let health_boost = object.field(HEALTH_BOOST).and_then(|h| match h.parse::<HealthBoost>() {
        Ok(boost) => Some(boost),
        Err(e) => {
            tracing::debug!("Ignoring health boost on {}: {}", object.id, e);
            None
        }
    });

    Ok(PetProfile {
        id: object.id.clone(),
        handle: object.handle.clone(),
        customer_id: object.field(CUSTOMER_ID).map(str::to_string),
        details: PetDetails {
            name,
            pet_type,
            birthday,
            breed: object.field(BREED).map(str::to_string),
            weight,
            allergies: parse_allergies(object.field(ALLERGIES)),
            health_boost,
            image: object.field(IMAGE).map(str::to_string),
        },
    })
}

/// Allergies are stored as a JSON list; older records use a comma-separated string
fn parse_allergies(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let list = serde_json::from_str::<Vec<String>>(raw)
        .unwrap_or_else(|_| raw.split(',').map(str::to_string).collect());

    normalize_allergies(list)
}
