use crate::models::product_model::ProductId;
use hyper::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product not found with id: {id}")]
    ProductNotFound { id: ProductId },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Product id mismatch: path id {path_id}, body id {body_id}")]
    IdMismatch { path_id: ProductId, body_id: ProductId },

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Failed to read request body: {0}")]
    Body(#[from] hyper::Error),

    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::ProductNotFound { .. } | StoreError::RouteNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StoreError::Validation { .. }
            | StoreError::IdMismatch { .. }
            | StoreError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            StoreError::Body(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
