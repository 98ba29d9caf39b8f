pub mod api_response;
pub mod network_config;
pub mod session;
pub mod token;
