//! GraphQL documents and response shapes for the Shopify Admin API.

use serde::Deserialize;

use crate::models::{Metaobject, MetaobjectField};

pub const CREATE_METAOBJECT: &str = r#"
mutation CreatePetProfile($metaobject: MetaobjectCreateInput!) {
  metaobjectCreate(metaobject: $metaobject) {
    metaobject { id handle fields { key value } }
    userErrors { field message code }
  }
}"#;

pub const FETCH_METAOBJECT: &str = r#"
query PetProfile($id: ID!) {
  metaobject(id: $id) { id handle fields { key value } }
}"#;

pub const DELETE_METAOBJECT: &str = r#"
mutation DeletePetProfile($id: ID!) {
  metaobjectDelete(id: $id) {
    deletedId
    userErrors { field message code }
  }
}"#;

pub const READ_CUSTOMER_INDEX: &str = r#"
query CustomerPets($id: ID!, $namespace: String!, $key: String!) {
  customer(id: $id) {
    metafield(namespace: $namespace, key: $key) { value compareDigest }
  }
}"#;

pub const WRITE_CUSTOMER_INDEX: &str = r#"
mutation SetCustomerPets($metafields: [MetafieldsSetInput!]!) {
  metafieldsSet(metafields: $metafields) {
    metafields { id }
    userErrors { field message code }
  }
}"#;

pub const STAGED_UPLOADS_CREATE: &str = r#"
mutation StagePetImage($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets { url resourceUrl parameters { name value } }
    userErrors { field message }
  }
}"#;

pub const FILE_CREATE: &str = r#"
mutation CreatePetImage($files: [FileCreateInput!]!) {
  fileCreate(files: $files) {
    files { id }
    userErrors { field message code }
  }
}"#;

/// Metafield type of the customer pet index
pub const INDEX_METAFIELD_TYPE: &str = "list.metaobject_reference";

/// Error code returned by `metafieldsSet` when `compareDigest` no longer matches
pub const STALE_OBJECT_CODE: &str = "STALE_OBJECT";

/// Standard GraphQL response envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

/// A mutation validation error
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Join user error messages into one caller-facing message
pub fn join_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Deserialize)]
pub struct MetaobjectNode {
    pub id: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub fields: Vec<MetaobjectField>,
}

impl From<MetaobjectNode> for Metaobject {
    fn from(node: MetaobjectNode) -> Self {
        Metaobject {
            id: node.id,
            handle: node.handle,
            fields: node.fields,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMetaobjectData {
    pub metaobject_create: CreateMetaobjectPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMetaobjectPayload {
    pub metaobject: Option<MetaobjectNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct FetchMetaobjectData {
    pub metaobject: Option<MetaobjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMetaobjectData {
    pub metaobject_delete: DeleteMetaobjectPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMetaobjectPayload {
    pub deleted_id: Option<String>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerIndexData {
    pub customer: Option<CustomerNode>,
}

#[derive(Debug, Deserialize)]
pub struct CustomerNode {
    pub metafield: Option<MetafieldNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldNode {
    pub value: String,
    #[serde(default)]
    pub compare_digest: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldsSetData {
    pub metafields_set: MetafieldsSetPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldsSetPayload {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadsData {
    pub staged_uploads_create: StagedUploadsPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUploadsPayload {
    #[serde(default)]
    pub staged_targets: Vec<StagedTarget>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedTarget {
    pub url: String,
    pub resource_url: String,
    #[serde(default)]
    pub parameters: Vec<StagedParameter>,
}

#[derive(Debug, Deserialize)]
pub struct StagedParameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCreateData {
    pub file_create: FileCreatePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCreatePayload {
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
pub struct FileNode {
    pub id: String,
}
