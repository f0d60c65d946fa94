use crate::{
    errors::product_error::{ProductClientError, ProductResult},
    models::product_model::{Product, ProductDraft, ProductId},
};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument};

/// Typed access to the backend product API.
///
/// Implementations perform no field validation; callers validate before invoking.
/// Every non-success outcome surfaces as an error without retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// GET the full product collection.
    async fn list_products(&self) -> ProductResult<Vec<Product>>;

    /// GET a single product.
    async fn get_product(&self, id: ProductId) -> ProductResult<Product>;

    /// POST a draft; the backend assigns the id.
    async fn create_product(&self, draft: &ProductDraft) -> ProductResult<Product>;

    /// PUT a full product. `id` must equal `product.id`. Last writer wins.
    async fn update_product(&self, id: ProductId, product: &Product) -> ProductResult<Product>;

    /// DELETE a product. Deleting an unknown id fails like any other error.
    async fn delete_product(&self, id: ProductId) -> ProductResult<()>;
}

pub struct HttpProductClient {
    client: Client,
    base_url: String,
}

impl HttpProductClient {
    pub fn new(base_url: impl Into<String>) -> ProductResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Product client targeting {}", base_url);
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn item_url(&self, id: ProductId) -> String {
        format!("{}/{}", self.base_url, id)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ProductResult<T> {
        let response = Self::ensure_success(response)?;
        Ok(response.json::<T>().await?)
    }

    fn ensure_success(response: Response) -> ProductResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            error!("Backend responded with {} for {}", status, response.url());
            Err(ProductClientError::Status { status })
        }
    }
}

#[async_trait]
impl ProductApi for HttpProductClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> ProductResult<Vec<Product>> {
        let response = self.client.get(&self.base_url).send().await?;
        let products: Vec<Product> = Self::read_json(response).await?;

        info!("Fetched {} products", products.len());
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> ProductResult<Product> {
        let response = self.client.get(self.item_url(id)).send().await?;
        let product: Product = Self::read_json(response).await?;

        info!("Fetched product {}", product.id);
        Ok(product)
    }

    #[instrument(skip(self, draft), fields(product_name = %draft.name))]
    async fn create_product(&self, draft: &ProductDraft) -> ProductResult<Product> {
        let response = self.client.post(&self.base_url).json(draft).send().await?;
        let created: Product = Self::read_json(response).await?;

        info!("Created product with id: {}", created.id);
        Ok(created)
    }

    #[instrument(skip(self, product))]
    async fn update_product(&self, id: ProductId, product: &Product) -> ProductResult<Product> {
        if product.id != id {
            return Err(ProductClientError::IdMismatch {
                path_id: id,
                body_id: product.id,
            });
        }

        let response = self.client.put(self.item_url(id)).json(product).send().await?;
        let updated: Product = Self::read_json(response).await?;

        info!("Updated product {}", id);
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> ProductResult<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        Self::ensure_success(response)?;

        info!("Deleted product {}", id);
        Ok(())
    }
}
