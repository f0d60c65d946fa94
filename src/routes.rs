use crate::models::product_model::ProductId;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Pages of the routed product views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    Add,
    Edit(ProductId),
}

#[derive(Error, Debug, PartialEq)]
#[error("No route matches path: {path}")]
pub struct UnknownRoute {
    pub path: String,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::List => "/products".to_string(),
            Route::Add => "/products/add".to_string(),
            Route::Edit(id) => format!("/products/edit/{}", id),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::List => "Products List",
            Route::Add => "Add New Product",
            Route::Edit(_) => "Edit Product",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownRoute {
            path: path.to_string(),
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            ["products"] => Ok(Route::List),
            ["products", "add"] => Ok(Route::Add),
            ["products", "edit", id] => id.parse().map(Route::Edit).map_err(|_| unknown()),
            _ => Err(unknown()),
        }
    }
}

/// Moves the front end to another page.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
