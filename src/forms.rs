pub mod product_form;
pub mod validation;

use serde::{Deserialize, Serialize};

/// Which field set the product forms use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Name, description and price.
    Basic,
    /// Adds stock quantity, category and image url, and stamps the creation date.
    #[default]
    Catalog,
}

impl FormVariant {
    pub fn stamps_created_date(&self) -> bool {
        matches!(self, FormVariant::Catalog)
    }
}
