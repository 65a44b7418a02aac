pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::Storefront;
pub use config::Config;
pub use db::{create_pool, DbPool};
pub use infrastructure::{DieselStore, MemoryStore};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Registers every storefront route. Shared by the server and the HTTP tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    use handlers::{cart, catalog, merchant, orders, wishlist};

    cfg.service(
        web::scope("/products")
            .route("", web::get().to(catalog::search_products))
            .route("/{id}", web::get().to(catalog::get_product)),
    )
    .service(
        web::scope("/cart")
            .route("", web::get().to(cart::view_cart))
            .route("", web::delete().to(cart::clear_cart))
            .route("/count", web::get().to(cart::cart_count))
            .route("/items", web::post().to(cart::add_item))
            .route("/items/{id}", web::put().to(cart::update_quantity))
            .route("/items/{id}", web::delete().to(cart::remove_item)),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(orders::place_order))
            .route("", web::get().to(orders::list_orders))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}/cancel", web::post().to(orders::cancel_order)),
    )
    .service(
        web::scope("/merchant")
            .route("/products", web::post().to(merchant::create_product))
            .route("/orders", web::get().to(merchant::list_all_orders))
            .route("/orders/{id}/status", web::put().to(merchant::update_status))
            .route("/orders/{id}/ship", web::post().to(merchant::mark_shipped))
            .route("/orders/{id}/deliver", web::post().to(merchant::mark_delivered))
            .route("/orders/{id}/payment", web::post().to(merchant::record_payment)),
    )
    .service(
        web::scope("/wishlist")
            .route("", web::get().to(wishlist::list_wishlist))
            .route("", web::post().to(wishlist::add_to_wishlist))
            .route("/{id}", web::delete().to(wishlist::remove_from_wishlist)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<Storefront>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = handlers::docs::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
