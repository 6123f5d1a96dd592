use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use pet_profile_proxy::config::Settings;
use pet_profile_proxy::core::{IndexPolicy, PetService};
use pet_profile_proxy::error::{handle_json_payload_error, handle_query_payload_error};
use pet_profile_proxy::routes::{self, AppState};
use pet_profile_proxy::services::{PetListCache, PetSchema, ShopifyClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with_target(false)
        .with_level(true);

    match log_format.as_str() {
        "pretty" => subscriber.pretty().init(),
        _ => subscriber.compact().init(),
    }

    info!("Starting pet profile proxy...");

    // Initialize Shopify client
    let schema = PetSchema {
        metaobject_type: settings.pets.metaobject_type.clone(),
        metafield_namespace: settings.pets.metafield_namespace.clone(),
        metafield_key: settings.pets.metafield_key.clone(),
    };

    let endpoint = settings.shopify.graphql_endpoint();
    let shopify = ShopifyClient::new(
        endpoint.clone(),
        settings.shopify.access_token.clone(),
        schema,
        Duration::from_secs(settings.shopify.timeout_secs.unwrap_or(30)),
    )
    .map_err(|e| {
        error!("Failed to create Shopify client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    info!("Shopify client initialized ({})", endpoint);

    // Pet list cache is optional
    let cache = if settings.cache.enabled {
        let ttl = settings.cache.ttl_secs.unwrap_or(60);
        let max_entries = settings.cache.max_entries.unwrap_or(10_000);
        info!("Pet list cache enabled ({} entries, TTL: {}s)", max_entries, ttl);
        Some(PetListCache::new(max_entries, ttl))
    } else {
        info!("Pet list cache disabled");
        None
    };

    let policy = IndexPolicy {
        guarded: settings.pets.guarded_index_append,
        max_attempts: settings.pets.max_append_attempts.max(1),
    };

    if !policy.guarded {
        info!("Guarded index append disabled, concurrent creates may drop index entries");
    }

    // Build application state
    let app_state = AppState {
        pets: PetService::new(Arc::new(shopify), cache, policy),
        max_image_bytes: settings.upload.max_image_bytes,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
