use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

use crate::models::{ImageUpload, Metaobject, MetaobjectField, PetIndex};
use crate::services::graphql::{self, GraphqlResponse};
use crate::services::store::{IndexGuard, PetStore, StoreError};

/// Shopify Admin GraphQL client
///
/// Handles all communication with the Shopify Admin API including:
/// - Creating, fetching and deleting pet profile metaobjects
/// - Reading and writing the customer pet index metafield
/// - Staging and registering pet images
pub struct ShopifyClient {
    endpoint: String,
    access_token: String,
    client: Client,
    schema: PetSchema,
}

/// Where pet data lives in the shop
#[derive(Debug, Clone)]
pub struct PetSchema {
    pub metaobject_type: String,
    pub metafield_namespace: String,
    pub metafield_key: String,
}

impl Default for PetSchema {
    fn default() -> Self {
        Self {
            metaobject_type: "pet_profile".to_string(),
            metafield_namespace: "custom".to_string(),
            metafield_key: "pets".to_string(),
        }
    }
}

impl ShopifyClient {
    /// Create a new client for the given GraphQL endpoint
    pub fn new(
        endpoint: String,
        access_token: String,
        schema: PetSchema,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            access_token,
            client,
            schema,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a GraphQL operation and decode its `data`
    async fn execute<T>(&self, operation: &str, query: &str, variables: Value) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!("Running {} against {}", operation, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("{} failed: {} - {}", operation, status, body);
            return Err(StoreError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let envelope: GraphqlResponse<T> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::InvalidResponse(format!("{}: {}", operation, e)))?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StoreError::GraphqlError(message));
        }

        envelope
            .data
            .ok_or_else(|| StoreError::InvalidResponse(format!("{}: missing data", operation)))
    }

    async fn stage_upload(&self, upload: &ImageUpload) -> Result<graphql::StagedTarget, StoreError> {
        let data: graphql::StagedUploadsData = self
            .execute(
                "stagedUploadsCreate",
                graphql::STAGED_UPLOADS_CREATE,
                json!({
                    "input": [{
                        "filename": upload.filename,
                        "mimeType": upload.mime_type,
                        "resource": "IMAGE",
                        "httpMethod": "POST",
                        "fileSize": upload.bytes.len().to_string(),
                    }]
                }),
            )
            .await?;

        let payload = data.staged_uploads_create;
        if !payload.user_errors.is_empty() {
            return Err(StoreError::UserErrors(graphql::join_user_errors(&payload.user_errors)));
        }

        payload
            .staged_targets
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::InvalidResponse("stagedUploadsCreate returned no target".into()))
    }
}

#[async_trait]
impl PetStore for ShopifyClient {
    async fn create_pet(&self, fields: Vec<MetaobjectField>) -> Result<Metaobject, StoreError> {
        let fields: Vec<Value> = fields
            .into_iter()
            .map(|f| json!({ "key": f.key, "value": f.value.unwrap_or_default() }))
            .collect();

        let data: graphql::CreateMetaobjectData = self
            .execute(
                "metaobjectCreate",
                graphql::CREATE_METAOBJECT,
                json!({
                    "metaobject": {
                        "type": self.schema.metaobject_type,
                        "fields": fields,
                    }
                }),
            )
            .await?;

        let payload = data.metaobject_create;
        if !payload.user_errors.is_empty() {
            return Err(StoreError::UserErrors(graphql::join_user_errors(&payload.user_errors)));
        }

        payload
            .metaobject
            .map(Metaobject::from)
            .ok_or_else(|| StoreError::InvalidResponse("metaobjectCreate returned no metaobject".into()))
    }

    async fn fetch_pet(&self, id: &str) -> Result<Option<Metaobject>, StoreError> {
        let data: graphql::FetchMetaobjectData = self
            .execute("metaobject", graphql::FETCH_METAOBJECT, json!({ "id": id }))
            .await?;

        Ok(data.metaobject.map(Metaobject::from))
    }

    async fn delete_pet(&self, id: &str) -> Result<String, StoreError> {
        let data: graphql::DeleteMetaobjectData = self
            .execute("metaobjectDelete", graphql::DELETE_METAOBJECT, json!({ "id": id }))
            .await?;

        let payload = data.metaobject_delete;
        if !payload.user_errors.is_empty() {
            return Err(StoreError::UserErrors(graphql::join_user_errors(&payload.user_errors)));
        }

        payload
            .deleted_id
            .ok_or_else(|| StoreError::InvalidResponse("metaobjectDelete returned no id".into()))
    }

    async fn read_index(&self, customer_id: &str) -> Result<PetIndex, StoreError> {
        let data: graphql::CustomerIndexData = self
            .execute(
                "customer.metafield",
                graphql::READ_CUSTOMER_INDEX,
                json!({
                    "id": customer_id,
                    "namespace": self.schema.metafield_namespace,
                    "key": self.schema.metafield_key,
                }),
            )
            .await?;

        let Some(metafield) = data.customer.and_then(|c| c.metafield) else {
            return Ok(PetIndex::default());
        };

        let ids: Vec<String> = if metafield.value.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&metafield.value).map_err(|e| {
                StoreError::InvalidResponse(format!("pet index for {} is not a list: {}", customer_id, e))
            })?
        };

        Ok(PetIndex {
            ids,
            digest: metafield.compare_digest,
        })
    }

    async fn write_index(
        &self,
        customer_id: &str,
        ids: &[String],
        guard: IndexGuard,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(ids)
            .map_err(|e| StoreError::InvalidResponse(format!("failed to encode pet index: {}", e)))?;

        let mut metafield = json!({
            "ownerId": customer_id,
            "namespace": self.schema.metafield_namespace,
            "key": self.schema.metafield_key,
            "type": graphql::INDEX_METAFIELD_TYPE,
            "value": value,
        });
        if let (IndexGuard::Expect(digest), Some(obj)) = (guard, metafield.as_object_mut()) {
            // An explicit null asserts the metafield does not exist yet
            obj.insert("compareDigest".to_string(), json!(digest));
        }

        let data: graphql::MetafieldsSetData = self
            .execute(
                "metafieldsSet",
                graphql::WRITE_CUSTOMER_INDEX,
                json!({ "metafields": [metafield] }),
            )
            .await?;

        let errors = data.metafields_set.user_errors;
        if errors
            .iter()
            .any(|e| e.code.as_deref() == Some(graphql::STALE_OBJECT_CODE))
        {
            return Err(StoreError::StaleIndex);
        }
        if !errors.is_empty() {
            return Err(StoreError::UserErrors(graphql::join_user_errors(&errors)));
        }

        Ok(())
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<String, StoreError> {
        let target = self.stage_upload(&upload).await?;

        let mut form = Form::new();
        for param in target.parameters {
            form = form.text(param.name, param.value);
        }
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename.clone())
            .mime_str(&upload.mime_type)?;
        form = form.part("file", part);

        let response = self.client.post(&target.url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(StoreError::UploadFailed(format!(
                "staged upload returned {}",
                response.status()
            )));
        }

        let data: graphql::FileCreateData = self
            .execute(
                "fileCreate",
                graphql::FILE_CREATE,
                json!({
                    "files": [{
                        "originalSource": target.resource_url,
                        "contentType": "IMAGE",
                        "alt": upload.filename,
                    }]
                }),
            )
            .await?;

        let payload = data.file_create;
        if !payload.user_errors.is_empty() {
            return Err(StoreError::UserErrors(graphql::join_user_errors(&payload.user_errors)));
        }

        let file = payload
            .files
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::UploadFailed("fileCreate returned no file".into()))?;

        tracing::debug!("Uploaded pet image {} as {}", upload.filename, file.id);

        Ok(file.id)
    }
}
