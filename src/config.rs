use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub shopify: ShopifySettings,
    #[serde(default)]
    pub pets: PetSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifySettings {
    /// e.g. `my-store.myshopify.com`
    pub store_domain: String,
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Full GraphQL endpoint, overrides the one derived from the store domain
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ShopifySettings {
    /// Admin GraphQL endpoint for the configured store
    pub fn graphql_endpoint(&self) -> String {
        if let Some(endpoint) = &self.endpoint {
            return endpoint.clone();
        }

        let domain = self
            .store_domain
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');

        format!("https://{}/admin/api/{}/graphql.json", domain, self.api_version)
    }
}

fn default_api_version() -> String { "2024-10".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct PetSettings {
    #[serde(default = "default_metaobject_type")]
    pub metaobject_type: String,
    #[serde(default = "default_metafield_namespace")]
    pub metafield_namespace: String,
    #[serde(default = "default_metafield_key")]
    pub metafield_key: String,
    #[serde(default = "default_true")]
    pub guarded_index_append: bool,
    #[serde(default = "default_max_append_attempts")]
    pub max_append_attempts: u32,
}

impl Default for PetSettings {
    fn default() -> Self {
        Self {
            metaobject_type: default_metaobject_type(),
            metafield_namespace: default_metafield_namespace(),
            metafield_key: default_metafield_key(),
            guarded_index_append: true,
            max_append_attempts: default_max_append_attempts(),
        }
    }
}

fn default_metaobject_type() -> String { "pet_profile".to_string() }
fn default_metafield_namespace() -> String { "custom".to_string() }
fn default_metafield_key() -> String { "pets".to_string() }
fn default_max_append_attempts() -> u32 { 3 }
fn default_true() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: None,
            max_entries: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_max_image_bytes() -> usize { 5 * 1024 * 1024 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with PETS_)
    /// 4. Shopify's conventional variables (SHOPIFY_STORE_DOMAIN, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // e.g., PETS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PETS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = apply_shopify_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PETS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Override Shopify settings from the variables the Shopify CLI and app templates use
fn apply_shopify_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("shopify.store_domain", env::var("SHOPIFY_STORE_DOMAIN").or_else(|_| env::var("SHOP"))),
        ("shopify.access_token", env::var("SHOPIFY_ADMIN_ACCESS_TOKEN").or_else(|_| env::var("SHOPIFY_ACCESS_TOKEN"))),
        ("shopify.api_version", env::var("SHOPIFY_API_VERSION")),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (key, value) in overrides {
        if let Ok(value) = value {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
