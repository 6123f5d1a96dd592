// HTTP surface tests

mod common;

use actix_web::{http::StatusCode, test, web, App};
use common::MemoryStore;
use pet_profile_proxy::core::{IndexPolicy, PetService};
use pet_profile_proxy::error::{handle_json_payload_error, handle_query_payload_error};
use pet_profile_proxy::models::{
    CreatePetResponse, DeletePetResponse, ErrorResponse, ListPetsResponse, Metaobject,
};
use pet_profile_proxy::routes::{self, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

const BOUNDARY: &str = "petformboundary";

fn state(store: &Arc<MemoryStore>) -> AppState {
    AppState {
        pets: PetService::new(store.clone(), None, IndexPolicy::default()),
        max_image_bytes: 1024,
    }
}

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state(&$store)))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

fn multipart_body(parts: &[(&str, Option<(&str, &str)>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file {
            Some((filename, mime)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    name, filename, mime
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[actix_web::test]
async fn test_health() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_create_list_delete_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/create")
        .set_json(json!({
            "customer_id": 123,
            "pet_data": {"name": "Buddy", "type": "dog", "weight": "medium", "allergies": ["beef"]}
        }))
        .to_request();
    let created: CreatePetResponse = test::call_and_read_body_json(&app, req).await;
    assert!(created.success);
    assert_eq!(created.pet_data.details.name, "Buddy");

    let req = test::TestRequest::get().uri("/list?customer_id=123").to_request();
    let listed: ListPetsResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.pets.len(), 1);
    assert_eq!(listed.pets[0].id, created.metaobject_id);

    let encoded = urlencoding::encode(&created.metaobject_id).into_owned();
    let req = test::TestRequest::delete()
        .uri(&format!("/delete/{}", encoded))
        .to_request();
    let deleted: DeletePetResponse = test::call_and_read_body_json(&app, req).await;
    assert!(deleted.success);
    assert_eq!(deleted.deleted_id, created.metaobject_id);

    let req = test::TestRequest::get().uri("/list?customer_id=123").to_request();
    let listed: ListPetsResponse = test::call_and_read_body_json(&app, req).await;
    assert!(listed.pets.is_empty());
}

#[actix_web::test]
async fn test_create_without_customer_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/create")
        .set_json(json!({"pet_data": {"name": "Buddy", "type": "dog", "weight": "medium"}}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "missing_field");
    assert_eq!(body.status_code, 400);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/create")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"customer_id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_json");
}

#[actix_web::test]
async fn test_upstream_rejection_message_is_returned() {
    let store = Arc::new(MemoryStore::new());
    store.reject_creates("Breed is too long");
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/create")
        .set_json(json!({
            "customer_id": "123",
            "pet_data": {"name": "Buddy", "type": "dog", "weight": "medium"}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Breed is too long");
}

#[actix_web::test]
async fn test_list_requires_customer_id() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let req = test::TestRequest::get().uri("/list").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_upstream_failure_is_generic_server_error() {
    let store = Arc::new(MemoryStore::new());
    store.fail_index_reads();
    let app = app!(store);

    let req = test::TestRequest::get().uri("/list?customer_id=123").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Internal server error");
}

#[actix_web::test]
async fn test_multipart_create_with_image() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let pet = json!({"name": "Milo", "type": "cat", "health_boost": "skin-and-coat"}).to_string();
    let body = multipart_body(&[
        ("customer_id", None, b"123".as_slice()),
        ("pet_data", None, pet.as_bytes()),
        ("image", Some(("milo.png", "image/png")), [0x89u8, 0x50, 0x4e, 0x47].as_slice()),
    ]);

    let req = test::TestRequest::post()
        .uri("/create")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();
    let created: CreatePetResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(created.pet_data.details.name, "Milo");
    assert_eq!(
        created.pet_data.details.image.as_deref(),
        Some("gid://shopify/MediaImage/1")
    );
    assert_eq!(store.uploads(), vec!["milo.png"]);
    assert_eq!(store.index("gid://shopify/Customer/123").len(), 1);
}

#[actix_web::test]
async fn test_multipart_rejects_non_image_upload() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let pet = json!({"name": "Milo", "type": "cat"}).to_string();
    let body = multipart_body(&[
        ("customer_id", None, b"123".as_slice()),
        ("pet_data", None, pet.as_bytes()),
        ("image", Some(("notes.txt", "text/plain")), b"not a picture".as_slice()),
    ]);

    let req = test::TestRequest::post()
        .uri("/create")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.pet_count(), 0);
}

#[actix_web::test]
async fn test_multipart_rejects_oversized_image() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let pet = json!({"name": "Milo", "type": "cat"}).to_string();
    let picture = vec![0u8; 2048];
    let body = multipart_body(&[
        ("customer_id", None, b"123".as_slice()),
        ("pet_data", None, pet.as_bytes()),
        ("image", Some(("milo.png", "image/png")), picture.as_slice()),
    ]);

    let req = test::TestRequest::post()
        .uri("/create")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_upload");
    assert!(store.uploads().is_empty());
    assert_eq!(store.pet_count(), 0);
}

#[actix_web::test]
async fn test_multipart_rejects_oversized_text_part() {
    let store = Arc::new(MemoryStore::new());
    let app = app!(store);

    let notes = "x".repeat(70 * 1024);
    let body = multipart_body(&[
        ("customer_id", None, b"123".as_slice()),
        ("notes", None, notes.as_bytes()),
    ]);

    let req = test::TestRequest::post()
        .uri("/create")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "invalid_upload");
    assert_eq!(store.pet_count(), 0);
}

#[actix_web::test]
async fn test_delete_decodes_pet_id_once() {
    let store = Arc::new(MemoryStore::new());
    store.insert_pet(Metaobject {
        id: "gid://shopify/Metaobject/7%41".to_string(),
        handle: None,
        fields: vec![],
    });
    let app = app!(store);

    let encoded = urlencoding::encode("gid://shopify/Metaobject/7%41").into_owned();
    let req = test::TestRequest::delete()
        .uri(&format!("/delete/{}", encoded))
        .to_request();
    let deleted: DeletePetResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(deleted.deleted_id, "gid://shopify/Metaobject/7%41");
    assert_eq!(store.pet_count(), 0);
}
