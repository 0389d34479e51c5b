//! Assigning inventory units to school requests

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::inventory::{FulfillRequest, FulfillmentOutcome},
    repository::WorkflowStore,
};

#[derive(Clone)]
pub struct FulfillmentService {
    store: Arc<dyn WorkflowStore>,
}

impl FulfillmentService {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    /// Deliver the given units to a request. The request becomes `fulfilled`
    /// once the units assigned to it over all calls reach its quantity, so a
    /// request can be served in several shipments.
    pub async fn fulfill(&self, data: FulfillRequest) -> AppResult<FulfillmentOutcome> {
        let mut item_ids = data.inventory_item_ids;
        item_ids.sort_unstable();
        item_ids.dedup();

        if item_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one inventory item is required".to_string(),
            ));
        }

        let outcome = self.store.fulfill_request(data.request_id, &item_ids).await?;

        if !outcome.school_credited {
            tracing::warn!(
                request_id = data.request_id,
                "No school directory entry matches the request, counter not updated"
            );
        }
        tracing::info!(
            request_id = data.request_id,
            delivered = outcome.delivered,
            assigned = outcome.assigned_count,
            quantity = outcome.quantity,
            status = %outcome.request_status,
            "Inventory assigned to school request"
        );

        Ok(outcome)
    }
}
