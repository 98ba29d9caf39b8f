use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider, ProviderError},
    types::Address,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    errors::CustomError,
    models::{
        network_config::NetworkConfig,
        token::{TokenBalanceEntry, TokenMetadata},
    },
    services::provider::{ChainDataProvider, WalletConnector},
};

use super::network_config::get_network_config;

// Wire shapes of the alchemy_* RPC extensions.

#[derive(Debug, Serialize, Deserialize)]
struct RawTokenBalances {
    #[serde(rename = "tokenBalances")]
    token_balances: Vec<RawTokenBalance>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTokenBalance {
    #[serde(rename = "contractAddress")]
    contract_address: Address,
    // null when the provider could not read the balance for this contract
    #[serde(rename = "tokenBalance")]
    token_balance: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTokenMetadata {
    symbol: Option<String>,
    decimals: Option<u8>,
    logo: Option<String>,
}

/// Chain-data client backed by an Alchemy-compatible JSON-RPC endpoint.
/// ENS resolution goes through the standard resolver; balances and token
/// metadata use the `alchemy_getTokenBalances` / `alchemy_getTokenMetadata`
/// extensions.
#[derive(Clone, Debug)]
pub struct AlchemyChainProvider {
    provider: Arc<Provider<Http>>,
    config: NetworkConfig,
}

impl AlchemyChainProvider {
    /// Create a new client by chain ID, verifying the endpoint actually
    /// serves that chain.
    pub async fn new(chain_id: u64, rpc_override: Option<String>) -> Result<Self, CustomError> {
        let mut config = get_network_config(chain_id)?;
        if let Some(url) = rpc_override {
            config.rpc_url = url;
        }
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| CustomError::NetworkError(e.to_string()))?;

        let connected_chain_id = provider.get_chainid().await?;
        if connected_chain_id.as_u64() != chain_id {
            return Err(CustomError::NetworkError(
                "Connected chain ID doesn't match requested chain ID".to_string(),
            ));
        }

        Ok(Self {
            provider: Arc::new(provider),
            config,
        })
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.config
    }
}

#[async_trait]
impl ChainDataProvider for AlchemyChainProvider {
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>, CustomError> {
        match self.provider.resolve_name(name).await {
            Ok(address) => Ok(Some(address)),
            // absent registration is not a transport failure
            Err(ProviderError::EnsError(_)) => Ok(None),
            Err(e) => Err(CustomError::StringifiedProviderError(e.to_string())),
        }
    }

    async fn list_balances(
        &self,
        address: Address,
    ) -> Result<Vec<TokenBalanceEntry>, CustomError> {
        let params = [format!("{:?}", address), "erc20".to_string()];
        let raw: RawTokenBalances = self
            .provider
            .request("alchemy_getTokenBalances", params)
            .await
            .map_err(|e| CustomError::StringifiedProviderError(e.to_string()))?;

        Ok(raw
            .token_balances
            .into_iter()
            .map(|b| TokenBalanceEntry {
                contract_address: b.contract_address,
                raw_balance: b.token_balance.unwrap_or_else(|| "0x0".to_string()),
            })
            .collect())
    }

    async fn get_metadata(&self, contract_address: Address) -> Result<TokenMetadata, CustomError> {
        let params = [format!("{:?}", contract_address)];
        let raw: RawTokenMetadata = self
            .provider
            .request("alchemy_getTokenMetadata", params)
            .await
            .map_err(|e| CustomError::StringifiedProviderError(e.to_string()))?;

        Ok(TokenMetadata {
            contract_address,
            symbol: raw.symbol,
            decimals: raw.decimals,
            logo_uri: raw.logo,
        })
    }
}

#[async_trait]
impl WalletConnector for AlchemyChainProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, CustomError> {
        self.provider
            .get_accounts()
            .await
            .map_err(|e| CustomError::WalletConnection(e.to_string()))
    }
}
