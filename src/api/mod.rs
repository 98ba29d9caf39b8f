use actix_web::web;
use std::sync::Arc;

use crate::services::{aggregator::BalanceAggregator, provider::WalletConnector};

mod handlers;

/// Shared application state: one aggregator (owning the session and the
/// metadata cache) and the wallet connector used for input prefill.
pub struct AppState {
    pub aggregator: BalanceAggregator,
    pub wallet: Arc<dyn WalletConnector>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(handlers::get_balances)
            .service(handlers::get_session)
            .service(handlers::get_accounts),
    );
}
