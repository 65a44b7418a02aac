use std::io;

use actix_web::web;
use dotenvy::dotenv;
use storefront::{build_server, create_pool, run_migrations, Config, DieselStore, Storefront};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url, config.pool_size)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    run_migrations(&pool).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let state = web::Data::new(Storefront::new(DieselStore::new(pool)));

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
