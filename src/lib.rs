pub mod clients;
pub mod console;
pub mod controllers;
pub mod errors;
pub mod forms;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod routes;
pub mod settings;
pub mod stub_backend;
