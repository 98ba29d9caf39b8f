pub struct Config {
    pub port: u16,
    pub chain_id: u64,
    pub rpc_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("Failed to parse PORT"),
            chain_id: std::env::var("CHAIN_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .expect("Failed to parse CHAIN_ID"),
            rpc_url: std::env::var("RPC_URL").ok(),
        }
    }
}
