pub mod product_model;
