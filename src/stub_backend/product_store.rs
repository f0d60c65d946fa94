use crate::{
    errors::store_error::StoreError,
    models::product_model::{Product, ProductDraft, ProductId},
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug)]
struct StoreState {
    products: BTreeMap<ProductId, Product>,
    next_id: ProductId,
}

/// In-memory product table. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct ProductStore {
    state: RwLock<StoreState>,
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                products: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub async fn list_products(&self) -> Vec<Product> {
        let state = self.state.read().await;
        let products: Vec<Product> = state.products.values().cloned().collect();

        info!("Retrieved {} products", products.len());
        products
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        let state = self.state.read().await;
        state
            .products
            .get(&id)
            .cloned()
            .ok_or(StoreError::ProductNotFound { id })
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        validate(&draft)?;

        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let product = Product::from_draft(id, draft);
        state.products.insert(id, product.clone());

        info!("Created product with id: {}", id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: ProductId,
        product: Product,
    ) -> Result<Product, StoreError> {
        if product.id != id {
            return Err(StoreError::IdMismatch {
                path_id: id,
                body_id: product.id,
            });
        }
        validate(&product.to_draft())?;

        let mut state = self.state.write().await;
        let slot = state
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound { id })?;
        *slot = product.clone();

        info!("Updated product {}", id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state
            .products
            .remove(&id)
            .map(|_| info!("Deleted product {}", id))
            .ok_or(StoreError::ProductNotFound { id })
    }
}

fn validate(draft: &ProductDraft) -> Result<(), StoreError> {
    if draft.name.trim().chars().count() < 3 {
        return Err(StoreError::Validation {
            message: "Product name must be at least 3 characters".to_string(),
        });
    }

    if draft.description.trim().is_empty() {
        return Err(StoreError::Validation {
            message: "Product description cannot be empty".to_string(),
        });
    }

    if draft.price < 0.0 {
        return Err(StoreError::Validation {
            message: format!("Invalid price: {}. Price cannot be negative", draft.price),
        });
    }

    if draft.stock_quantity.is_some_and(|quantity| quantity < 0) {
        return Err(StoreError::Validation {
            message: "Stock quantity cannot be negative".to_string(),
        });
    }

    Ok(())
}
