//! Product list view: the displayed collection, delete confirmation, and the add/edit dialogs.

use crate::{
    clients::product_client::ProductApi,
    controllers::{
        create_controller::CreateFormController, edit_controller::EditFormController, FormEvent,
        FormEventSender,
    },
    forms::FormVariant,
    models::product_model::{Product, ProductId},
    notifications::{ConfirmationPrompt, Notification, NotificationSink},
    routes::{Navigator, Route},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this product?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    /// Also the state after a failed load; the previous collection is kept.
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateTarget {
    /// No such id in the displayed collection.
    NotFound,
    /// The update dialog now holds a copy of the product.
    Dialog(Product),
    /// Routed flow: the navigator was sent to the edit page.
    Routed(Route),
}

pub struct ListController<A: ProductApi> {
    api: Arc<A>,
    notifier: Arc<dyn NotificationSink>,
    prompt: Arc<dyn ConfirmationPrompt>,
    navigator: Option<Arc<dyn Navigator>>,
    variant: FormVariant,
    products: Vec<Product>,
    state: ListState,
    add_dialog_visible: bool,
    update_dialog_visible: bool,
    selected_product: Option<Product>,
}

impl<A: ProductApi> ListController<A> {
    pub fn new(
        api: Arc<A>,
        notifier: Arc<dyn NotificationSink>,
        prompt: Arc<dyn ConfirmationPrompt>,
    ) -> Self {
        Self {
            api,
            notifier,
            prompt,
            navigator: None,
            variant: FormVariant::default(),
            products: Vec::new(),
            state: ListState::Idle,
            add_dialog_visible: false,
            update_dialog_visible: false,
            selected_product: None,
        }
    }

    /// Switches `navigate_to_update` from the dialog flow to page navigation.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn with_form_variant(mut self, variant: FormVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ListState::Loading
    }

    pub fn add_dialog_visible(&self) -> bool {
        self.add_dialog_visible
    }

    pub fn update_dialog_visible(&self) -> bool {
        self.update_dialog_visible
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.selected_product.as_ref()
    }

    /// Replaces the whole collection. On failure the previous collection stays on screen.
    #[instrument(skip(self))]
    pub async fn load_products(&mut self) {
        self.state = ListState::Loading;

        match self.api.list_products().await {
            Ok(products) => {
                info!("Loaded {} products", products.len());
                self.products = products;
            }
            Err(err) => {
                error!("Failed to load products: {}", err);
                self.notifier
                    .notify(Notification::error("Failed to load products"));
            }
        }

        self.state = ListState::Loaded;
    }

    #[instrument(skip(self))]
    pub async fn confirm_delete(&mut self, id: ProductId) -> DeleteOutcome {
        if !self.prompt.confirm(DELETE_CONFIRMATION).await {
            info!("Delete of product {} declined", id);
            return DeleteOutcome::Declined;
        }

        match self.api.delete_product(id).await {
            Ok(()) => {
                info!("Product {} deleted", id);
                self.notifier
                    .notify(Notification::success("Product deleted successfully"));
                self.load_products().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!("Failed to delete product {}: {}", id, err);
                self.notifier
                    .notify(Notification::error("Failed to delete product"));
                DeleteOutcome::Failed
            }
        }
    }

    pub fn show_add_dialog(&mut self) {
        self.add_dialog_visible = true;
    }

    /// Closes the add dialog and reloads, whether or not anything was created.
    pub async fn hide_add_dialog(&mut self) {
        self.add_dialog_visible = false;
        self.load_products().await;
    }

    pub fn show_update_dialog(&mut self, product: &Product) {
        self.selected_product = Some(product.clone());
        self.update_dialog_visible = true;
    }

    /// Closes the update dialog and reloads, whether or not anything was updated.
    pub async fn hide_update_dialog(&mut self) {
        self.update_dialog_visible = false;
        self.selected_product = None;
        self.load_products().await;
    }

    /// Looks the id up in the displayed collection only; never fetches.
    #[instrument(skip(self))]
    pub fn navigate_to_update(&mut self, id: ProductId) -> UpdateTarget {
        let Some(product) = self.products.iter().find(|product| product.id == id).cloned() else {
            warn!("Product {} is not in the displayed list", id);
            self.notifier.notify(Notification::error("Product not found"));
            return UpdateTarget::NotFound;
        };

        match &self.navigator {
            Some(navigator) => {
                let route = Route::Edit(id);
                navigator.navigate(route);
                UpdateTarget::Routed(route)
            }
            None => {
                self.show_update_dialog(&product);
                UpdateTarget::Dialog(product)
            }
        }
    }

    /// Routes a child form's completion signal to the matching dialog close.
    pub async fn handle_event(&mut self, event: FormEvent) {
        match event {
            FormEvent::Saved(_) => self.hide_add_dialog().await,
            FormEvent::Updated(_) => self.hide_update_dialog().await,
        }
    }

    pub fn create_form(&self, events: FormEventSender) -> CreateFormController<A> {
        CreateFormController::new(
            Arc::clone(&self.api),
            Arc::clone(&self.notifier),
            self.variant,
            events,
        )
    }

    /// Edit form for the product selected in the update dialog, if any.
    pub fn edit_form(&self, events: FormEventSender) -> Option<EditFormController<A>> {
        self.selected_product.as_ref().map(|product| {
            EditFormController::from_product(
                Arc::clone(&self.api),
                Arc::clone(&self.notifier),
                product,
                events,
            )
        })
    }

    /// Edit form for the routed flow, fetched by id.
    pub async fn load_edit_form(
        &self,
        id: ProductId,
        events: FormEventSender,
    ) -> Option<EditFormController<A>> {
        EditFormController::load(Arc::clone(&self.api), Arc::clone(&self.notifier), id, events)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clients::product_client::MockProductApi,
        errors::product_error::ProductClientError,
        notifications::{MockConfirmationPrompt, MockNotificationSink, Severity},
        routes::MockNavigator,
    };
    use mockall::{predicate::eq, Sequence};

    fn product(id: ProductId, name: &str, price: f64) -> Product {
        let mut product = Product::new(name, format!("{} description", name), price);
        product.id = id;
        product
    }

    fn pen() -> Product {
        let mut pen = product(1, "Pen", 1.5);
        pen.description = "Blue pen".to_string();
        pen
    }

    fn server_error() -> ProductClientError {
        ProductClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn controller(
        api: MockProductApi,
        notifier: MockNotificationSink,
        prompt: MockConfirmationPrompt,
    ) -> ListController<MockProductApi> {
        ListController::new(Arc::new(api), Arc::new(notifier), Arc::new(prompt))
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .times(1)
            .returning(|| Ok(vec![pen()]));

        let mut controller = controller(
            api,
            MockNotificationSink::new(),
            MockConfirmationPrompt::new(),
        );
        assert_eq!(controller.state(), ListState::Idle);

        controller.load_products().await;

        assert_eq!(controller.state(), ListState::Loaded);
        assert!(!controller.is_loading());
        assert_eq!(controller.products().len(), 1);
        assert_eq!(controller.products()[0].price, 1.5);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_stale_collection() {
        let mut seq = Sequence::new();
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![pen()]));
        api.expect_list_products()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(server_error()));
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Error && n.detail == "Failed to load products")
            .times(1)
            .return_const(());

        let mut controller = controller(api, notifier, MockConfirmationPrompt::new());
        controller.load_products().await;
        controller.load_products().await;

        assert_eq!(controller.state(), ListState::Loaded);
        assert_eq!(controller.products(), &[pen()]);
    }

    #[tokio::test]
    async fn test_confirmed_delete_notifies_then_reloads_once() {
        let mut seq = Sequence::new();
        let mut api = MockProductApi::new();
        api.expect_delete_product()
            .with(eq(1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        api.expect_list_products()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![product(2, "Lamp", 20.0)]));
        let mut prompt = MockConfirmationPrompt::new();
        prompt
            .expect_confirm()
            .withf(|message| message.to_string() == DELETE_CONFIRMATION)
            .times(1)
            .return_const(true);
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Success && n.detail == "Product deleted successfully")
            .times(1)
            .return_const(());

        let mut controller = controller(api, notifier, prompt);

        assert_eq!(controller.confirm_delete(1).await, DeleteOutcome::Deleted);
        assert!(controller.products().iter().all(|p| p.id != 1));
    }

    #[tokio::test]
    async fn test_declined_delete_does_nothing() {
        let mut api = MockProductApi::new();
        api.expect_delete_product().never();
        api.expect_list_products().never();
        let mut prompt = MockConfirmationPrompt::new();
        prompt.expect_confirm().times(1).return_const(false);
        let mut notifier = MockNotificationSink::new();
        notifier.expect_notify().never();

        let mut controller = controller(api, notifier, prompt);

        assert_eq!(controller.confirm_delete(1).await, DeleteOutcome::Declined);
    }

    #[tokio::test]
    async fn test_failed_delete_only_notifies() {
        let mut api = MockProductApi::new();
        api.expect_delete_product()
            .returning(|_| Err(server_error()));
        api.expect_list_products().never();
        let mut prompt = MockConfirmationPrompt::new();
        prompt.expect_confirm().return_const(true);
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Error && n.detail == "Failed to delete product")
            .times(1)
            .return_const(());

        let mut controller = controller(api, notifier, prompt);

        assert_eq!(controller.confirm_delete(1).await, DeleteOutcome::Failed);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_fetched() {
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .times(1)
            .returning(|| Ok(vec![pen()]));
        api.expect_get_product().never();
        let mut notifier = MockNotificationSink::new();
        notifier
            .expect_notify()
            .withf(|n| n.severity == Severity::Error && n.detail == "Product not found")
            .times(1)
            .return_const(());

        let mut controller = controller(api, notifier, MockConfirmationPrompt::new());
        controller.load_products().await;

        assert_eq!(controller.navigate_to_update(99), UpdateTarget::NotFound);
        assert!(!controller.update_dialog_visible());
    }

    #[tokio::test]
    async fn test_navigate_opens_dialog_with_copy() {
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .returning(|| Ok(vec![pen()]));

        let mut controller = controller(
            api,
            MockNotificationSink::new(),
            MockConfirmationPrompt::new(),
        );
        controller.load_products().await;

        assert_eq!(controller.navigate_to_update(1), UpdateTarget::Dialog(pen()));
        assert!(controller.update_dialog_visible());
        assert_eq!(controller.selected_product(), Some(&pen()));

        let (tx, _rx) = crate::controllers::form_events();
        let mut form = controller.edit_form(tx).expect("a product is selected");
        form.edited_mut().price = 9.0;
        assert_eq!(controller.products()[0].price, 1.5);
    }

    #[tokio::test]
    async fn test_navigate_with_navigator_routes_to_edit_page() {
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .returning(|| Ok(vec![pen()]));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq(Route::Edit(1)))
            .times(1)
            .return_const(());

        let mut controller = controller(
            api,
            MockNotificationSink::new(),
            MockConfirmationPrompt::new(),
        )
        .with_navigator(Arc::new(navigator));
        controller.load_products().await;

        assert_eq!(
            controller.navigate_to_update(1),
            UpdateTarget::Routed(Route::Edit(1))
        );
        assert!(!controller.update_dialog_visible());
    }

    #[tokio::test]
    async fn test_hiding_dialogs_reloads_every_time() {
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .times(4)
            .returning(|| Ok(Vec::new()));

        let mut controller = controller(
            api,
            MockNotificationSink::new(),
            MockConfirmationPrompt::new(),
        );
        controller.show_add_dialog();
        assert!(controller.add_dialog_visible());

        controller.hide_add_dialog().await;
        controller.hide_add_dialog().await;
        assert!(!controller.add_dialog_visible());

        controller.show_update_dialog(&pen());
        controller.hide_update_dialog().await;
        controller.hide_update_dialog().await;
        assert!(!controller.update_dialog_visible());
        assert!(controller.selected_product().is_none());
    }

    #[tokio::test]
    async fn test_saved_event_closes_add_dialog() {
        let mut api = MockProductApi::new();
        api.expect_list_products()
            .times(1)
            .returning(|| Ok(vec![pen()]));

        let mut controller = controller(
            api,
            MockNotificationSink::new(),
            MockConfirmationPrompt::new(),
        );
        controller.show_add_dialog();

        controller.handle_event(FormEvent::Saved(pen())).await;

        assert!(!controller.add_dialog_visible());
        assert_eq!(controller.products(), &[pen()]);
    }
}
