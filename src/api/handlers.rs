use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::{
    errors::CustomError,
    models::{api_response::success_response, session::SortKey},
};

use super::AppState;

#[derive(Deserialize)]
pub struct BalanceQuery {
    sort: Option<String>,
}

/// Run a full fetch cycle for the given identifier (hex address or name)
/// and return the merged, sorted rows.
#[get("/balances/{identifier}")]
pub async fn get_balances(
    identifier: web::Path<String>,
    query: web::Query<BalanceQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, CustomError> {
    let sort_key = SortKey::from_query(query.sort.as_deref());
    let rows = state.aggregator.run_fetch_cycle(&identifier, sort_key).await?;
    Ok(success_response(rows))
}

/// Current session snapshot: cycle state, rows, error.
#[get("/session")]
pub async fn get_session(state: web::Data<AppState>) -> Result<HttpResponse, CustomError> {
    Ok(success_response(state.aggregator.session_snapshot()))
}

/// Accounts exposed by the wallet connector, used to prefill the
/// identifier input. Independent of any fetch cycle.
#[get("/accounts")]
pub async fn get_accounts(state: web::Data<AppState>) -> Result<HttpResponse, CustomError> {
    let accounts = state.wallet.request_accounts().await?;
    Ok(success_response(accounts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::token::{TokenBalanceEntry, TokenMetadata},
        services::{
            aggregator::BalanceAggregator, metadata_cache::MetadataCache,
            provider::ChainDataProvider, provider::WalletConnector,
        },
    };
    use actix_web::{test, App};
    use async_trait::async_trait;
    use ethers::types::Address;
    use serde_json::Value;
    use std::sync::Arc;

    struct StubProvider {
        wallet: Address,
        contract: Address,
    }

    #[async_trait]
    impl ChainDataProvider for StubProvider {
        async fn resolve_name(&self, _name: &str) -> Result<Option<Address>, CustomError> {
            Ok(Some(self.wallet))
        }

        async fn list_balances(
            &self,
            _address: Address,
        ) -> Result<Vec<TokenBalanceEntry>, CustomError> {
            Ok(vec![TokenBalanceEntry {
                contract_address: self.contract,
                raw_balance: "0xf4240".to_string(),
            }])
        }

        async fn get_metadata(
            &self,
            contract_address: Address,
        ) -> Result<TokenMetadata, CustomError> {
            Ok(TokenMetadata {
                contract_address,
                symbol: Some("USDC".to_string()),
                decimals: Some(6),
                logo_uri: None,
            })
        }
    }

    #[async_trait]
    impl WalletConnector for StubProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>, CustomError> {
            Ok(vec![self.wallet])
        }
    }

    fn app_state() -> web::Data<AppState> {
        let provider = Arc::new(StubProvider {
            wallet: Address::repeat_byte(0x11),
            contract: Address::repeat_byte(0x22),
        });
        web::Data::new(AppState {
            aggregator: BalanceAggregator::new(provider.clone(), MetadataCache::new()),
            wallet: provider,
        })
    }

    #[actix_web::test]
    async fn balances_endpoint_returns_rows() {
        let app = test::init_service(
            App::new().app_data(app_state()).configure(crate::api::config),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/balances/wallet.eth?sort=balance")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "SUCCESS");
        let rows = body["result"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["symbol"], "USDC");
        assert_eq!(rows[0]["formatted_balance"], "1");
    }

    #[actix_web::test]
    async fn accounts_endpoint_returns_wallet_accounts() {
        let app = test::init_service(
            App::new().app_data(app_state()).configure(crate::api::config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/accounts").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "SUCCESS");
        assert_eq!(body["result"].as_array().unwrap().len(), 1);
    }
}
