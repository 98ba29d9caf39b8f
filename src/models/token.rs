use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Placeholder symbol for tokens whose metadata could not be fetched.
pub const UNKNOWN_SYMBOL: &str = "Unknown";

/// One token held by the queried wallet, exactly as the provider reports it.
/// The raw balance stays encoded (decimal or 0x-hex string) until display time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalanceEntry {
    pub contract_address: Address,
    pub raw_balance: String,
}

/// Display attributes for a token contract. Any field may be missing when the
/// provider cannot resolve the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub contract_address: Address,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub logo_uri: Option<String>,
}

/// Merged balance + metadata view, ready for rendering. `formatted_balance`
/// is absent when decimals are unknown (the raw value cannot be scaled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRow {
    pub contract_address: Address,
    pub symbol: String,
    pub decimals: Option<u8>,
    pub raw_balance: String,
    pub formatted_balance: Option<String>,
    pub logo_uri: Option<String>,
}
