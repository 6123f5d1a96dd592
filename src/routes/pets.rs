use actix_multipart::Multipart;
use actix_web::{guard, http::header, web, HttpResponse};
use futures_util::TryStreamExt;

use crate::core::PetService;
use crate::error::ProxyError;
use crate::models::{
    CreatePetRequest, CreatePetResponse, DeletePetResponse, HealthResponse, ImageUpload,
    ListPetsQuery, ListPetsResponse, PetData,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pets: PetService,
    pub max_image_bytes: usize,
}

/// Configure all pet profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::resource("/create")
                .route(
                    web::post()
                        .guard(guard::fn_guard(is_multipart))
                        .to(create_pet_multipart),
                )
                .route(web::post().to(create_pet)),
        )
        .route("/list", web::get().to(list_pets))
        .route("/delete/{pet_id}", web::delete().to(delete_pet));
}

fn is_multipart(ctx: &guard::GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with("multipart/form-data"))
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create a pet profile
///
/// POST /create
///
/// Request body:
/// ```json
/// {
///   "customer_id": "123",
///   "pet_data": {"name": "Buddy", "type": "dog", "weight": "medium", "allergies": ["beef"]}
/// }
/// ```
async fn create_pet(
    state: web::Data<AppState>,
    req: web::Json<CreatePetRequest>,
) -> Result<HttpResponse, ProxyError> {
    let req = req.into_inner();
    let profile = state.pets.create(&req.customer_id, req.pet_data, None).await?;

    Ok(HttpResponse::Ok().json(CreatePetResponse {
        success: true,
        metaobject_id: profile.id.clone(),
        pet_data: profile,
    }))
}

/// Create a pet profile from a form upload
///
/// POST /create (multipart/form-data)
///
/// Parts: `customer_id` (text), `pet_data` (JSON text), `image` (optional file)
async fn create_pet_multipart(
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ProxyError> {
    let mut customer_id = String::new();
    let mut pet_data: Option<PetData> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(mut field) = payload.try_next().await.map_err(invalid_upload)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let mime_type = field.content_type().map(|m| m.essence_str().to_string());

        let limit = if name == "image" { state.max_image_bytes } else { 64 * 1024 };
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(invalid_upload)? {
            if bytes.len() + chunk.len() > limit {
                return Err(ProxyError::InvalidUpload(format!(
                    "part '{}' exceeds {} bytes",
                    name, limit
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "customer_id" | "customerId" => {
                customer_id = String::from_utf8_lossy(&bytes).trim().to_string();
            }
            "pet_data" | "petData" => {
                let data = serde_json::from_slice(&bytes).map_err(|e| {
                    ProxyError::InvalidPetData(format!("pet_data is not valid JSON: {}", e))
                })?;
                pet_data = Some(data);
            }
            "image" if !bytes.is_empty() => {
                let mime_type = mime_type.unwrap_or_default();
                if !mime_type.starts_with("image/") {
                    return Err(ProxyError::InvalidUpload(format!(
                        "image must be an image file, got '{}'",
                        mime_type
                    )));
                }
                image = Some(ImageUpload {
                    filename: filename.unwrap_or_else(|| "pet-image".to_string()),
                    mime_type,
                    bytes,
                });
            }
            other => tracing::debug!("Ignoring form part '{}'", other),
        }
    }

    let profile = state.pets.create(&customer_id, pet_data, image).await?;

    Ok(HttpResponse::Ok().json(CreatePetResponse {
        success: true,
        metaobject_id: profile.id.clone(),
        pet_data: profile,
    }))
}

fn invalid_upload(err: actix_multipart::MultipartError) -> ProxyError {
    ProxyError::InvalidUpload(err.to_string())
}

/// List a customer's pets
///
/// GET /list?customer_id={customerId}
async fn list_pets(
    state: web::Data<AppState>,
    query: web::Query<ListPetsQuery>,
) -> Result<HttpResponse, ProxyError> {
    let customer_id = query.into_inner().customer_id.unwrap_or_default();
    let pets = state.pets.list(&customer_id).await?;

    Ok(HttpResponse::Ok().json(ListPetsResponse { pets }))
}

/// Delete a pet profile
///
/// DELETE /delete/{petId}
///
/// The id may be a bare numeric id or a percent-encoded metaobject GID.
async fn delete_pet(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ProxyError> {
    // Path extraction has already percent-decoded the id
    let pet_id = path.into_inner();
    let deleted_id = state.pets.delete(&pet_id).await?;

    Ok(HttpResponse::Ok().json(DeletePetResponse {
        success: true,
        deleted_id,
    }))
}
