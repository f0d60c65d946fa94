use crate::{
    clients::product_client::ProductApi,
    controllers::{FormEvent, FormEventSender},
    models::product_model::{Product, ProductId},
    notifications::{Notification, NotificationSink},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The edited copy has no id; nothing was sent.
    Skipped,
    Updated(Product),
    /// The backend rejected the update; the edited copy is kept for another try.
    Failed,
}

/// Edits a private copy of a product. The source entry stays untouched until the update succeeds.
pub struct EditFormController<A: ProductApi> {
    api: Arc<A>,
    notifier: Arc<dyn NotificationSink>,
    events: FormEventSender,
    edited: Product,
}

impl<A: ProductApi> EditFormController<A> {
    /// Dialog flow: the caller already holds the product.
    pub fn from_product(
        api: Arc<A>,
        notifier: Arc<dyn NotificationSink>,
        product: &Product,
        events: FormEventSender,
    ) -> Self {
        Self {
            api,
            notifier,
            events,
            edited: product.clone(),
        }
    }

    /// Routed flow: fetch the product by id before editing.
    #[instrument(skip(api, notifier, events))]
    pub async fn load(
        api: Arc<A>,
        notifier: Arc<dyn NotificationSink>,
        id: ProductId,
        events: FormEventSender,
    ) -> Option<Self> {
        match api.get_product(id).await {
            Ok(product) => Some(Self::from_product(api, notifier, &product, events)),
            Err(err) => {
                error!("Failed to load product {}: {}", id, err);
                notifier.notify(Notification::error("Failed to load product"));
                None
            }
        }
    }

    pub fn edited(&self) -> &Product {
        &self.edited
    }

    pub fn edited_mut(&mut self) -> &mut Product {
        &mut self.edited
    }

    #[instrument(skip(self), fields(product_id = self.edited.id))]
    pub async fn submit(&mut self) -> EditOutcome {
        if !self.edited.is_persisted() {
            warn!("Edited product has no id, skipping update");
            return EditOutcome::Skipped;
        }

        match self.api.update_product(self.edited.id, &self.edited).await {
            Ok(updated) => {
                info!("Product updated successfully: {}", updated.id);
                self.notifier
                    .notify(Notification::success("Product updated successfully"));
                if self.events.send(FormEvent::Updated(updated.clone())).is_err() {
                    debug!("No listener for updated event");
                }
                EditOutcome::Updated(updated)
            }
            Err(err) => {
                error!("Failed to update product: {}", err);
                self.notifier
                    .notify(Notification::error("Failed to update product"));
                EditOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clients::product_client::MockProductApi,
        controllers::form_events,
        errors::product_error::ProductClientError,
        notifications::{MockNotificationSink, Severity},
    };
    use mockall::predicate::eq;

    fn pen() -> Product {
        let mut product = Product::new("Pen", "Blue pen", 1.5);
        product.id = 1;
        product
    }

    #[tokio::test]
    async fn test_edits_do_not_leak_into_source() {
        let source = pen();
        let (tx, _rx) = form_events();
        let mut controller = EditFormController::from_product(
            Arc::new(MockProductApi::new()),
            Arc::new(MockNotificationSink::new()),
            &source,
            tx,
        );

        controller.edited_mut().price = 2.0;

        assert_eq!(source.price, 1.5);
        assert_eq!(controller.edited().price, 2.0);
    }

    #[tokio::test]
    async fn test_missing_id_skips_silently() {
        let mut api = MockProductApi::new();
        api.expect_update_product().never();
        let mut notifier = MockNotificationSink::new();
        notifier.expect_notify().never();
        let (tx, _rx) = form_events();

        let mut controller = EditFormController::from_product(
            Arc::new(api),
            Arc::new(notifier),
            &Product::new("Pen", "Blue pen", 1.5),
            tx,
        );

        assert_eq!(controller.submit().await, EditOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_successful_update_emits_updated() {
        let mut api = MockProductApi::new();
        api.expect_update_product()
            .withf(|id, product| *id == 1 && product.price == 3.0)
            .times(1)
            .returning(|_, product| Ok(product.clone()));
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Success && n.detail == "Product updated successfully")
            .times(1)
            .return_const(());
        let (tx, mut rx) = form_events();

        let mut controller =
            EditFormController::from_product(Arc::new(api), Arc::new(notifier), &pen(), tx);
        controller.edited_mut().price = 3.0;

        let outcome = controller.submit().await;

        let updated = match outcome {
            EditOutcome::Updated(updated) => updated,
            other => panic!("expected an update, got {:?}", other),
        };
        assert_eq!(rx.try_recv().unwrap(), FormEvent::Updated(updated));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_copy() {
        let mut api = MockProductApi::new();
        api.expect_update_product().times(1).returning(|_, _| {
            Err(ProductClientError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            })
        });
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Error && n.detail == "Failed to update product")
            .times(1)
            .return_const(());
        let (tx, mut rx) = form_events();

        let mut controller =
            EditFormController::from_product(Arc::new(api), Arc::new(notifier), &pen(), tx);
        controller.edited_mut().name = "Red pen".to_string();

        assert_eq!(controller.submit().await, EditOutcome::Failed);
        assert_eq!(controller.edited().name, "Red pen");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_fetches_by_id() {
        let mut api = MockProductApi::new();
        api.expect_get_product()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(pen()));
        let (tx, _rx) = form_events();

        let controller =
            EditFormController::load(Arc::new(api), Arc::new(MockNotificationSink::new()), 1, tx)
                .await
                .expect("product should load");

        assert_eq!(controller.edited(), &pen());
    }

    #[tokio::test]
    async fn test_load_failure_notifies() {
        let mut api = MockProductApi::new();
        api.expect_get_product().returning(|_| {
            Err(ProductClientError::Status {
                status: reqwest::StatusCode::NOT_FOUND,
            })
        });
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.detail == "Failed to load product")
            .times(1)
            .return_const(());
        let (tx, _rx) = form_events();

        let controller =
            EditFormController::load(Arc::new(api), Arc::new(notifier), 5, tx).await;

        assert!(controller.is_none());
    }
}
