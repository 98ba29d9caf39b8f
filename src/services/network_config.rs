use crate::{errors::CustomError, models::network_config::NetworkConfig};

/// Get network configuration based on chain ID. Alchemy-backed endpoints
/// take their key from `ALCHEMY_API_KEY`.
pub fn get_network_config(chain_id: u64) -> Result<NetworkConfig, CustomError> {
    let api_key = std::env::var("ALCHEMY_API_KEY").unwrap_or_default();
    match chain_id {
        1 => Ok(NetworkConfig {
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            rpc_url: format!("https://eth-mainnet.g.alchemy.com/v2/{}", api_key),
            symbol: "ETH".to_string(),
        }),
        137 => Ok(NetworkConfig {
            chain_id: 137,
            name: "Polygon Mainnet".to_string(),
            rpc_url: format!("https://polygon-mainnet.g.alchemy.com/v2/{}", api_key),
            symbol: "MATIC".to_string(),
        }),
        11155111 => Ok(NetworkConfig {
            chain_id: 11155111,
            name: "Sepolia Testnet".to_string(),
            rpc_url: format!("https://eth-sepolia.g.alchemy.com/v2/{}", api_key),
            symbol: "ETH".to_string(),
        }),
        _ => Err(CustomError::UnsupportedChainError(chain_id)),
    }
}
