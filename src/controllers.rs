pub mod create_controller;
pub mod edit_controller;
pub mod list_controller;

use crate::models::product_model::Product;
use tokio::sync::mpsc;

/// Completion signals a form controller sends to the view that opened it.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Saved(Product),
    Updated(Product),
}

pub type FormEventSender = mpsc::UnboundedSender<FormEvent>;
pub type FormEventReceiver = mpsc::UnboundedReceiver<FormEvent>;

pub fn form_events() -> (FormEventSender, FormEventReceiver) {
    mpsc::unbounded_channel()
}
