//! Contact form inbox

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        contact::{ContactMessage, ContactPage, ContactQuery, CreateContactMessage},
        enums::ContactStatus,
        PageWindow,
    },
    repository::Repository,
    services::email::{Notification, Notifier},
};

#[derive(Clone)]
pub struct ContactService {
    repository: Repository,
    notifier: Arc<dyn Notifier>,
    /// Inbox receiving forwarded messages
    inbox: Option<String>,
}

impl ContactService {
    pub fn new(repository: Repository, notifier: Arc<dyn Notifier>, inbox: Option<String>) -> Self {
        Self {
            repository,
            notifier,
            inbox,
        }
    }

    /// Store the message, then forward it to the inbox when one is configured
    pub async fn submit(&self, data: CreateContactMessage) -> AppResult<ContactMessage> {
        data.validate()?;
        let message = self.repository.contact.create(&data).await?;

        match self.inbox.as_deref() {
            Some(inbox) => {
                let notification = Notification::contact_forward(inbox, &data);
                if let Err(e) = self.notifier.send(notification).await {
                    tracing::warn!(message_id = message.id, error = %e, "Contact forward failed");
                }
            }
            None => tracing::warn!(
                message_id = message.id,
                "email.contact_to is not set, contact message not forwarded"
            ),
        }

        Ok(message)
    }

    pub async fn list(&self, query: &ContactQuery) -> AppResult<ContactPage> {
        let window = PageWindow::new(query.page, query.limit);
        let (messages, total) = self.repository.contact.list(query, window).await?;
        Ok(ContactPage {
            messages,
            pagination: window.pagination(total),
        })
    }

    pub async fn set_status(&self, id: i64, status: &str) -> AppResult<ContactMessage> {
        let status: ContactStatus = status.parse().map_err(AppError::InvalidStatus)?;
        self.repository.contact.update_status(id, status).await
    }
}
