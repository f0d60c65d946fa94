pub mod product_client;
