use actix_web::{HttpResponse, ResponseError};
use ethers::providers::ProviderError;
use serde::Serialize;
use thiserror::Error;

use crate::models::api_response::ApiResponse;

#[derive(Error, Debug)]
pub enum CustomError {
    #[error("Name did not resolve to any address: {0}")]
    UnresolvedName(String),

    #[error("Name resolution failed: {0}")]
    ResolutionFailed(String),

    #[error("Failed to fetch token balances: {0}")]
    BalanceFetch(String),

    #[error("Wallet connection failed: {0}")]
    WalletConnection(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    #[error("Provider error: {0}")]
    StringifiedProviderError(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChainError(u64),
}

// Custom Error type
#[derive(Debug, Serialize)]
pub struct ApiError {
    code: u16,
    message: String,
}

// Implement ResponseError for CustomError
impl ResponseError for CustomError {
    fn error_response(&self) -> HttpResponse {
        let api_error = ApiError {
            code: match self {
                CustomError::UnresolvedName(_) => 404,
                CustomError::ResolutionFailed(_) => 502,
                CustomError::BalanceFetch(_) => 502,
                CustomError::WalletConnection(_) => 503,
                CustomError::InvalidIdentifier(_) => 400,
                CustomError::NetworkError(_) => 500,
                CustomError::ProviderError(_) => 502,
                CustomError::StringifiedProviderError(_) => 502,
                CustomError::UnsupportedChainError(_) => 400,
            },
            message: self.to_string(),
        };

        let response = ApiResponse {
            status: "FAILURE".to_string(),
            code: api_error.code,
            result: None::<()>,
            error: Some(api_error),
        };

        match self {
            CustomError::UnresolvedName(_) => HttpResponse::NotFound().json(response),
            CustomError::ResolutionFailed(_) => HttpResponse::BadGateway().json(response),
            CustomError::BalanceFetch(_) => HttpResponse::BadGateway().json(response),
            CustomError::WalletConnection(_) => HttpResponse::ServiceUnavailable().json(response),
            CustomError::InvalidIdentifier(_) => HttpResponse::BadRequest().json(response),
            CustomError::NetworkError(_) => HttpResponse::InternalServerError().json(response),
            CustomError::ProviderError(_) => HttpResponse::BadGateway().json(response),
            CustomError::StringifiedProviderError(_) => HttpResponse::BadGateway().json(response),
            CustomError::UnsupportedChainError(_) => HttpResponse::BadRequest().json(response),
        }
    }
}
