use async_trait::async_trait;
use ethers::types::Address;

use crate::{
    errors::CustomError,
    models::token::{TokenBalanceEntry, TokenMetadata},
};

/// External chain-data API the aggregator depends on. All wire semantics
/// live behind this seam; the aggregator never sees transport details.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Resolve a human-readable name to an address. `Ok(None)` means the
    /// name exists in no registry; `Err` is a transport/provider failure.
    async fn resolve_name(&self, name: &str) -> Result<Option<Address>, CustomError>;

    /// List every token balance the provider knows for `address`. Zero
    /// balances are passed through as-is, never filtered here.
    async fn list_balances(&self, address: Address)
        -> Result<Vec<TokenBalanceEntry>, CustomError>;

    /// Fetch display metadata for one token contract.
    async fn get_metadata(&self, contract_address: Address) -> Result<TokenMetadata, CustomError>;
}

/// Wallet extension capability, used only to prefill the identifier input.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<Address>, CustomError>;
}
