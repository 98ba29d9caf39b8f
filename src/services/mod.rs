pub mod aggregator;
pub mod blockchain_service;
pub mod metadata_cache;
pub mod network_config;
pub mod provider;
