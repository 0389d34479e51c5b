//! Business logic services

pub mod contact;
pub mod donations;
pub mod email;
pub mod fulfillment;
pub mod inventory;
pub mod school_requests;
pub mod schools;
pub mod stats;
pub mod status;
pub mod transitions;

use std::sync::Arc;

use crate::{config::EmailConfig, repository::{Repository, WorkflowStore}};

use email::Notifier;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub donations: donations::DonationsService,
    pub school_requests: school_requests::SchoolRequestsService,
    pub status: status::StatusService,
    pub inventory: inventory::InventoryService,
    pub fulfillment: fulfillment::FulfillmentService,
    pub schools: schools::SchoolsService,
    pub contact: contact::ContactService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, email_config: EmailConfig) -> Self {
        let contact_to = email_config.contact_to.clone();
        let store: Arc<dyn WorkflowStore> = Arc::new(repository.clone());
        let notifier: Arc<dyn Notifier> = Arc::new(email::EmailService::new(email_config));

        Self {
            donations: donations::DonationsService::new(repository.clone()),
            school_requests: school_requests::SchoolRequestsService::new(repository.clone()),
            status: status::StatusService::new(store.clone(), notifier.clone()),
            inventory: inventory::InventoryService::new(repository.clone()),
            fulfillment: fulfillment::FulfillmentService::new(store),
            schools: schools::SchoolsService::new(repository.clone()),
            contact: contact::ContactService::new(repository.clone(), notifier, contact_to),
            stats: stats::StatsService::new(repository),
        }
    }
}
