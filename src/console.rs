//! Terminal renderings for the interactive front end.

use crate::{
    forms::product_form::ProductForm,
    models::product_model::Product,
    notifications::{Notification, NotificationSink, Severity},
    routes::{Navigator, Route},
};
use std::fmt::Write;
use std::sync::Mutex;
use tracing::{error, info};

pub const HELP: &str = "\
Commands:
  list            reload and show all products
  show <id>       fetch one product from the backend
  add             open the add form
  edit <id>       edit a product from the list
  delete <id>     delete a product after confirmation
  help            show this help
  quit            exit";

/// Prints notifications to stdout and mirrors them into the log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => info!("{}", notification.detail),
            Severity::Error => error!("{}", notification.detail),
        }
        println!("{}", notification);
    }
}

/// Records the last requested route; the console loop picks it up after each command.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    pending: Mutex<Option<Route>>,
}

impl ConsoleNavigator {
    pub fn take_pending(&self) -> Option<Route> {
        self.pending
            .lock()
            .map(|mut pending| pending.take())
            .unwrap_or_else(|poisoned| poisoned.into_inner().take())
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        info!("Navigating to {}", route);
        match self.pending.lock() {
            Ok(mut pending) => *pending = Some(route),
            Err(poisoned) => *poisoned.into_inner() = Some(route),
        }
    }
}

/// Formats the product table. Catalog columns appear only when some product carries them.
pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.".to_string();
    }

    let catalog = products
        .iter()
        .any(|product| product.stock_quantity.is_some() || product.category.is_some());

    let mut out = String::new();
    let _ = write!(out, "{:>5}  {:<20}  {:<30}  {:>10}", "ID", "Name", "Description", "Price");
    if catalog {
        let _ = write!(out, "  {:>6}  {:<15}", "Stock", "Category");
    }
    out.push('\n');

    for product in products {
        let _ = write!(
            out,
            "{:>5}  {:<20}  {:<30}  {:>10.2}",
            product.id,
            truncate(&product.name, 20),
            truncate(&product.description, 30),
            product.price
        );
        if catalog {
            let stock = product
                .stock_quantity
                .map(|quantity| quantity.to_string())
                .unwrap_or_default();
            let category = product.category.as_deref().unwrap_or_default();
            let _ = write!(out, "  {:>6}  {:<15}", stock, truncate(category, 15));
        }
        out.push('\n');
    }

    out.truncate(out.trim_end().len());
    out
}

pub fn render_product(product: &Product) -> String {
    let mut out = format!(
        "#{} {}\n  {}\n  price: {:.2}",
        product.id, product.name, product.description, product.price
    );
    if let Some(quantity) = product.stock_quantity {
        let _ = write!(out, "\n  stock: {}", quantity);
    }
    if let Some(category) = &product.category {
        let _ = write!(out, "\n  category: {}", category);
    }
    if let Some(url) = &product.image_url {
        let _ = write!(out, "\n  image: {}", url);
    }
    if let Some(created) = product.created_date {
        let _ = write!(out, "\n  created: {}", created.format("%Y-%m-%d %H:%M"));
    }
    out
}

/// One line per invalid field, as shown under the form.
pub fn render_form_errors(form: &ProductForm) -> String {
    form.error_messages()
        .iter()
        .map(|message| format!("  - {}", message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
