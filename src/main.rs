use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

mod api;
mod config;
mod errors;
mod models;
mod services;

use api::AppState;
use services::{
    aggregator::BalanceAggregator, blockchain_service::AlchemyChainProvider,
    metadata_cache::MetadataCache,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = config::Config::from_env();

    let provider = AlchemyChainProvider::new(config.chain_id, config.rpc_url.clone())
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    info!(
        "connected to {} (chain {})",
        provider.network().name,
        provider.network().chain_id
    );

    let provider = Arc::new(provider);
    let state = web::Data::new(AppState {
        aggregator: BalanceAggregator::new(provider.clone(), MetadataCache::new()),
        wallet: provider,
    });

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:8080")
            .allowed_origin("http://localhost:5173")
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::ACCEPT,
            ])
            .supports_credentials();
        App::new()
            .app_data(state.clone())
            .configure(api::config)
            .wrap(cors)
    })
    .bind(("127.0.0.1", config.port))?
    .run()
    .await
}
