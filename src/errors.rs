pub mod form_error;
pub mod product_error;
pub mod store_error;
