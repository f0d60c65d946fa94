use crate::models::product_model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProductClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend responded with status {status}")]
    Status { status: reqwest::StatusCode },

    #[error("Product id mismatch: path id {path_id}, body id {body_id}")]
    IdMismatch { path_id: ProductId, body_id: ProductId },
}

pub type ProductResult<T> = Result<T, ProductClientError>;

impl ProductClientError {
    /// True when the backend answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProductClientError::Status { status } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}
