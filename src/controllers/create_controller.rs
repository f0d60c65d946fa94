use crate::{
    clients::product_client::ProductApi,
    controllers::{FormEvent, FormEventSender},
    forms::{product_form::ProductForm, FormVariant},
    models::product_model::Product,
    notifications::{Notification, NotificationSink},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    Created(Product),
    /// The backend rejected the create; the form keeps its values.
    Failed,
}

pub struct CreateFormController<A: ProductApi> {
    api: Arc<A>,
    notifier: Arc<dyn NotificationSink>,
    events: FormEventSender,
    form: ProductForm,
}

impl<A: ProductApi> CreateFormController<A> {
    pub fn new(
        api: Arc<A>,
        notifier: Arc<dyn NotificationSink>,
        variant: FormVariant,
        events: FormEventSender,
    ) -> Self {
        Self {
            api,
            notifier,
            events,
            form: ProductForm::new(variant),
        }
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        let mut draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                warn!("Create form rejected: {}", err);
                self.form.mark_all_touched();
                self.notifier.notify(Notification::error_with_summary(
                    "Validation Error",
                    "Please fill in all required fields correctly",
                ));
                return SubmitOutcome::Invalid;
            }
        };

        if self.form.variant().stamps_created_date() {
            draft.created_date = Some(Utc::now());
        }

        match self.api.create_product(&draft).await {
            Ok(created) => {
                info!("Product created successfully: {}", created.id);
                self.notifier
                    .notify(Notification::success("Product created successfully"));
                self.form.reset();
                if self.events.send(FormEvent::Saved(created.clone())).is_err() {
                    debug!("No listener for saved event");
                }
                SubmitOutcome::Created(created)
            }
            Err(err) => {
                error!("Failed to create product: {}", err);
                self.notifier
                    .notify(Notification::error("Failed to create product"));
                SubmitOutcome::Failed
            }
        }
    }
}
