#![allow(dead_code)]

use async_trait::async_trait;
use product_console::{
    notifications::{ConfirmationPrompt, Notification, NotificationSink},
    stub_backend::{self, product_store::ProductStore},
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Starts a stub backend on an ephemeral port and returns its product API base url.
pub async fn spawn_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(stub_backend::serve(listener, Arc::new(ProductStore::new())));
    format!("http://{}{}", addr, stub_backend::API_BASE_PATH)
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn details(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|notification| notification.detail.clone())
            .collect()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

pub struct FixedAnswer(pub bool);

#[async_trait]
impl ConfirmationPrompt for FixedAnswer {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}
