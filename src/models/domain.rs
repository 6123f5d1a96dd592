use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Species of a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Dog,
    Cat,
}

impl PetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetType::Dog => "dog",
            PetType::Cat => "cat",
        }
    }
}

impl FromStr for PetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" => Ok(PetType::Dog),
            "cat" => Ok(PetType::Cat),
            other => Err(format!("unknown pet type '{}' (expected dog or cat)", other)),
        }
    }
}

/// Weight class used to size portions. Cats always use `Cat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightCategory {
    Tiny,
    Medium,
    Large,
    Cat,
}

impl WeightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightCategory::Tiny => "tiny",
            WeightCategory::Medium => "medium",
            WeightCategory::Large => "large",
            WeightCategory::Cat => "cat",
        }
    }
}

impl FromStr for WeightCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tiny" => Ok(WeightCategory::Tiny),
            "medium" => Ok(WeightCategory::Medium),
            "large" => Ok(WeightCategory::Large),
            "cat" => Ok(WeightCategory::Cat),
            other => Err(format!(
                "unknown weight '{}' (expected tiny, medium, large or cat)",
                other
            )),
        }
    }
}

/// Supplement add-on selected during signup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBoost {
    JointSupport,
    SkinAndCoat,
    DigestiveHealth,
    ImmuneSupport,
    WeightManagement,
}

impl HealthBoost {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthBoost::JointSupport => "joint_support",
            HealthBoost::SkinAndCoat => "skin_and_coat",
            HealthBoost::DigestiveHealth => "digestive_health",
            HealthBoost::ImmuneSupport => "immune_support",
            HealthBoost::WeightManagement => "weight_management",
        }
    }
}

impl FromStr for HealthBoost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The signup form uses dashes, stored records use underscores
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "joint_support" => Ok(HealthBoost::JointSupport),
            "skin_and_coat" => Ok(HealthBoost::SkinAndCoat),
            "digestive_health" => Ok(HealthBoost::DigestiveHealth),
            "immune_support" => Ok(HealthBoost::ImmuneSupport),
            "weight_management" => Ok(HealthBoost::WeightManagement),
            other => Err(format!("unknown health boost '{}'", other)),
        }
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HealthBoost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated pet record, as stored in the `pet_profile` metaobject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetDetails {
    pub name: String,
    #[serde(rename = "type")]
    pub pet_type: PetType,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub breed: Option<String>,
    pub weight: WeightCategory,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub health_boost: Option<HealthBoost>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A stored pet profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfile {
    pub id: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(flatten)]
    pub details: PetDetails,
}

/// A single key/value field on an upstream metaobject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaobjectField {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl MetaobjectField {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.into()),
        }
    }
}

/// A metaobject as returned by the upstream store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metaobject {
    pub id: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetaobjectField>,
}

impl Metaobject {
    /// Value of a field, with empty strings treated as absent
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .and_then(|f| f.value.as_deref())
            .filter(|v| !v.trim().is_empty())
    }
}

/// The ordered list of pet ids attached to one customer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetIndex {
    pub ids: Vec<String>,
    /// Upstream concurrency token, `None` when the metafield does not exist yet
    pub digest: Option<String>,
}

/// An image submitted alongside a pet profile
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

const CUSTOMER_GID_PREFIX: &str = "gid://shopify/Customer/";
const METAOBJECT_GID_PREFIX: &str = "gid://shopify/Metaobject/";

/// Normalize a customer id to its GID form
pub fn customer_gid(id: &str) -> String {
    normalize_gid(id, CUSTOMER_GID_PREFIX)
}

/// Normalize a pet (metaobject) id to its GID form
pub fn metaobject_gid(id: &str) -> String {
    normalize_gid(id, METAOBJECT_GID_PREFIX)
}

fn normalize_gid(id: &str, prefix: &str) -> String {
    let id = id.trim();
    if id.starts_with("gid://") {
        id.to_string()
    } else {
        format!("{}{}", prefix, id)
    }
}

/// Deserialize an optional value, treating `null` and blank strings as absent
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Deserialize an id that may be sent as a JSON string or number
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) => s,
        Some(Id::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
