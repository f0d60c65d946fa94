use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned product identifier. `0` marks an entity the backend has not saved yet.
pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// Product data without an id, as sent to the backend on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            price,
            stock_quantity: None,
            category: None,
            image_url: None,
            created_date: None,
        }
    }

    /// Attaches a backend-assigned id to a draft.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock_quantity: draft.stock_quantity,
            category: draft.category,
            image_url: draft.image_url,
            created_date: draft.created_date,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock_quantity: self.stock_quantity,
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            created_date: self.created_date,
        }
    }
}
