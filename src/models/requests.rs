use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::domain::{
    empty_string_as_none, string_or_number, HealthBoost, PetDetails, PetType, WeightCategory,
};

/// Request to create a pet profile
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePetRequest {
    #[serde(default, alias = "customerId", deserialize_with = "string_or_number")]
    pub customer_id: String,
    #[serde(default, alias = "petData")]
    pub pet_data: Option<PetData>,
}

/// Pet fields as submitted by the signup form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PetData {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "empty_string_as_none")]
    pub pet_type: Option<PetType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub breed: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub weight: Option<WeightCategory>,
    #[serde(default, deserialize_with = "string_or_list")]
    #[validate(length(max = 30))]
    pub allergies: Vec<String>,
    #[serde(default, alias = "healthBoost", deserialize_with = "empty_string_as_none")]
    pub health_boost: Option<HealthBoost>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PetData {
    /// Check the submitted fields and coerce them into a stored record
    pub fn into_details(self) -> Result<PetDetails, String> {
        self.validate().map_err(|e| e.to_string())?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("pet name is required".to_string());
        }

        let pet_type = self
            .pet_type
            .ok_or_else(|| "pet type is required (dog or cat)".to_string())?;

        let weight = match (pet_type, self.weight) {
            (PetType::Cat, _) => WeightCategory::Cat,
            (PetType::Dog, Some(WeightCategory::Cat)) => {
                return Err("weight 'cat' is only valid for cats".to_string())
            }
            (PetType::Dog, Some(w)) => w,
            (PetType::Dog, None) => return Err("weight is required for dogs".to_string()),
        };

        Ok(PetDetails {
            name,
            pet_type,
            birthday: self.birthday,
            breed: non_blank(self.breed),
            weight,
            allergies: normalize_allergies(self.allergies),
            health_boost: self.health_boost,
            image: non_blank(self.image),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim, drop empties and drop duplicates while keeping first-seen order
pub fn normalize_allergies(allergies: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(allergies.len());
    for allergy in allergies {
        let allergy = allergy.trim().to_string();
        if !allergy.is_empty() && !out.contains(&allergy) {
            out.push(allergy);
        }
    }
    out
}

/// Accept either a JSON array or a comma-separated string
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Allergies {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Allergies>::deserialize(deserializer)? {
        Some(Allergies::List(list)) => list,
        Some(Allergies::Text(text)) => text.split(',').map(str::to_string).collect(),
        None => Vec::new(),
    })
}

/// Query parameters for listing a customer's pets
#[derive(Debug, Clone, Deserialize)]
pub struct ListPetsQuery {
    #[serde(default, alias = "customerId")]
    pub customer_id: Option<String>,
}
