// Route exports
pub mod pets;

use actix_web::web;

pub use pets::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(pets::configure);
}
